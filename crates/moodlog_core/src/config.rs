//! Session configuration.
//!
//! # Responsibility
//! - Name the store keys each application profile reads and writes.
//! - Carry the date format and completion-log persistence switch into a
//!   session as one explicit value.
//!
//! # Invariants
//! - A validated config has non-empty, distinct store keys.
//! - `date_format` is a non-empty strftime pattern chrono can render.

use crate::clock::try_format_day;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Renders like a US-English `toLocaleDateString`, e.g. `10/19/2026`.
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Which of the two applications a session stores data for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppProfile {
    Journal,
    #[default]
    Tracker,
}

impl AppProfile {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Journal => "journal",
            Self::Tracker => "tracker",
        }
    }

    /// Default key names for this profile.
    pub fn store_keys(self) -> StoreKeys {
        match self {
            Self::Journal => StoreKeys {
                entries: "journal-entries".to_string(),
                theme: "journal-theme".to_string(),
                habits: "journal-habits".to_string(),
                completions: "journal-completions".to_string(),
            },
            Self::Tracker => StoreKeys {
                entries: "entries".to_string(),
                theme: "theme".to_string(),
                habits: "habits".to_string(),
                completions: "completions".to_string(),
            },
        }
    }
}

/// Key names used against the key-value store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreKeys {
    pub entries: String,
    pub theme: String,
    pub habits: String,
    pub completions: String,
}

impl StoreKeys {
    fn all(&self) -> [(&'static str, &str); 4] {
        [
            ("entries", self.entries.as_str()),
            ("theme", self.theme.as_str()),
            ("habits", self.habits.as_str()),
            ("completions", self.completions.as_str()),
        ]
    }
}

/// Configuration for one `JournalService` session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub profile: AppProfile,
    /// Overrides the profile's default key names.
    pub keys: Option<StoreKeys>,
    /// strftime pattern for entry dates and completion days.
    pub date_format: String,
    /// Completion logs are memory-only unless this is set.
    pub persist_completions: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::for_profile(AppProfile::default())
    }
}

impl CoreConfig {
    pub fn for_profile(profile: AppProfile) -> Self {
        Self {
            profile,
            keys: None,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            persist_completions: false,
        }
    }

    /// Parses and validates a JSON config. Missing fields take defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Effective key names.
    pub fn store_keys(&self) -> StoreKeys {
        self.keys
            .clone()
            .unwrap_or_else(|| self.profile.store_keys())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let keys = self.store_keys();
        let named = keys.all();
        for (index, (slot, key)) in named.iter().enumerate() {
            if key.trim().is_empty() {
                return Err(ConfigError::EmptyKey(*slot));
            }
            if named[..index].iter().any(|(_, other)| other == key) {
                return Err(ConfigError::DuplicateKey(key.to_string()));
            }
        }

        if self.date_format.trim().is_empty()
            || try_format_day(NaiveDate::default(), &self.date_format).is_none()
        {
            return Err(ConfigError::InvalidDateFormat(self.date_format.clone()));
        }

        Ok(())
    }
}

/// Configuration parse and validation errors.
#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    EmptyKey(&'static str),
    DuplicateKey(String),
    InvalidDateFormat(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid config json: {err}"),
            Self::EmptyKey(slot) => write!(f, "store key for `{slot}` cannot be empty"),
            Self::DuplicateKey(key) => write!(f, "store key `{key}` is used more than once"),
            Self::InvalidDateFormat(format) => write!(f, "invalid date format `{format}`"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AppProfile, ConfigError, CoreConfig, DEFAULT_DATE_FORMAT};

    #[test]
    fn empty_json_yields_tracker_defaults() {
        let config = CoreConfig::from_json_str("{}").unwrap();
        assert_eq!(config.profile, AppProfile::Tracker);
        assert_eq!(config.date_format, DEFAULT_DATE_FORMAT);
        assert!(!config.persist_completions);
        assert_eq!(config.store_keys().entries, "entries");
    }

    #[test]
    fn journal_profile_uses_prefixed_keys() {
        let config = CoreConfig::from_json_str(r#"{"profile":"journal"}"#).unwrap();
        assert_eq!(config.store_keys().entries, "journal-entries");
    }

    #[test]
    fn explicit_keys_override_profile() {
        let config = CoreConfig::from_json_str(
            r#"{"keys":{"entries":"e","theme":"t","habits":"h","completions":"c"}}"#,
        )
        .unwrap();
        assert_eq!(config.store_keys().habits, "h");
    }

    #[test]
    fn duplicate_and_empty_keys_are_rejected() {
        let duplicate = CoreConfig::from_json_str(
            r#"{"keys":{"entries":"x","theme":"x","habits":"h","completions":"c"}}"#,
        )
        .unwrap_err();
        assert!(matches!(duplicate, ConfigError::DuplicateKey(key) if key == "x"));

        let empty = CoreConfig::from_json_str(
            r#"{"keys":{"entries":" ","theme":"t","habits":"h","completions":"c"}}"#,
        )
        .unwrap_err();
        assert!(matches!(empty, ConfigError::EmptyKey("entries")));
    }

    #[test]
    fn invalid_date_format_is_rejected() {
        let err = CoreConfig::from_json_str(r#"{"date_format":"%Q"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDateFormat(_)));
    }

    #[test]
    fn time_only_date_format_is_rejected() {
        for format in ["%H:%M", "%Y-%m-%d %T"] {
            let raw = format!(r#"{{"date_format":"{format}"}}"#);
            let err = CoreConfig::from_json_str(&raw).unwrap_err();
            assert!(
                matches!(&err, ConfigError::InvalidDateFormat(rejected) if rejected == format),
                "{format} was accepted"
            );
        }

        let config = CoreConfig::from_json_str(r#"{"date_format":"%d.%m.%Y"}"#).unwrap();
        assert_eq!(config.date_format, "%d.%m.%Y");
    }
}
