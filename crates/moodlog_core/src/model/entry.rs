//! Entry domain model.
//!
//! # Invariants
//! - `id` is derived from the creation timestamp and never reused.
//! - `text` is trimmed and non-empty whenever an entry is saved.
//! - `habits` keeps the names selected at the last save, even when the
//!   habit is later renamed or deleted.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Creation-time-ordered identifier, in Unix epoch milliseconds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntryId(pub i64);

impl Display for EntryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fixed emoji set offered by the mood picker.
///
/// Serialized as the emoji itself so stored values stay human readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Mood {
    #[default]
    #[serde(rename = "😊")]
    Happy,
    #[serde(rename = "😢")]
    Sad,
    #[serde(rename = "😡")]
    Angry,
    #[serde(rename = "😴")]
    Tired,
    #[serde(rename = "🤔")]
    Thoughtful,
}

impl Mood {
    /// Picker order.
    pub const ALL: [Mood; 5] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Angry,
        Mood::Tired,
        Mood::Thoughtful,
    ];

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Happy => "😊",
            Self::Sad => "😢",
            Self::Angry => "😡",
            Self::Tired => "😴",
            Self::Thoughtful => "🤔",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Angry => "angry",
            Self::Tired => "tired",
            Self::Thoughtful => "thoughtful",
        }
    }

    /// Accepts either the emoji or its lowercase name.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|mood| mood.emoji() == trimmed || mood.name().eq_ignore_ascii_case(trimmed))
    }
}

impl Display for Mood {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.emoji())
    }
}

/// One journaled record for a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub text: String,
    pub mood: Mood,
    /// Local calendar date rendered with the session date format.
    pub date: String,
    /// Journal-profile entries are stored without this field.
    #[serde(default)]
    pub habits: Vec<String>,
}

impl Entry {
    pub fn new(
        id: EntryId,
        text: impl Into<String>,
        mood: Mood,
        date: impl Into<String>,
        habits: Vec<String>,
    ) -> Self {
        Self {
            id,
            text: text.into(),
            mood,
            date: date.into(),
            habits,
        }
    }

    /// Checks invariants required before an entry is persisted.
    pub fn validate(&self) -> Result<(), EntryValidationError> {
        if self.text.trim().is_empty() {
            return Err(EntryValidationError::EmptyText(self.id));
        }
        if self.text.trim() != self.text {
            return Err(EntryValidationError::UntrimmedText(self.id));
        }
        Ok(())
    }

    /// Case-insensitive substring match against `text`.
    ///
    /// `needle` must already be lowercase.
    pub fn text_contains(&self, needle: &str) -> bool {
        needle.is_empty() || self.text.to_lowercase().contains(needle)
    }
}

/// Entry invariant violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValidationError {
    EmptyText(EntryId),
    UntrimmedText(EntryId),
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText(id) => write!(f, "entry {id} has empty text"),
            Self::UntrimmedText(id) => write!(f, "entry {id} has surrounding whitespace"),
        }
    }
}

impl Error for EntryValidationError {}

#[cfg(test)]
mod tests {
    use super::{Entry, EntryId, EntryValidationError, Mood};

    #[test]
    fn mood_serializes_as_emoji() {
        let json = serde_json::to_string(&Mood::Tired).unwrap();
        assert_eq!(json, "\"😴\"");
        let parsed: Mood = serde_json::from_str("\"🤔\"").unwrap();
        assert_eq!(parsed, Mood::Thoughtful);
    }

    #[test]
    fn mood_parse_accepts_emoji_and_name() {
        assert_eq!(Mood::parse("😢"), Some(Mood::Sad));
        assert_eq!(Mood::parse(" Angry "), Some(Mood::Angry));
        assert_eq!(Mood::parse("🙂"), None);
    }

    #[test]
    fn entry_without_habits_field_deserializes_with_empty_habits() {
        let json = r#"{"id":1700000000000,"text":"Good day","mood":"😊","date":"11/14/2023"}"#;
        let entry: Entry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id, EntryId(1_700_000_000_000));
        assert!(entry.habits.is_empty());
    }

    #[test]
    fn validate_rejects_blank_and_untrimmed_text() {
        let blank = Entry::new(EntryId(1), "  ", Mood::Happy, "1/1/2026", Vec::new());
        assert_eq!(blank.validate(), Err(EntryValidationError::EmptyText(EntryId(1))));

        let padded = Entry::new(EntryId(2), " hi ", Mood::Happy, "1/1/2026", Vec::new());
        assert_eq!(
            padded.validate(),
            Err(EntryValidationError::UntrimmedText(EntryId(2)))
        );
    }
}
