//! Habit, completion log and habit-selection models.
//!
//! # Invariants
//! - `Habit::name` is trimmed and non-empty.
//! - A completion log never holds the same date twice for one habit.
//! - A selection never holds the same habit id twice.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type HabitId = Uuid;

/// User-defined recurring activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: HabitId,
    pub name: String,
}

impl Habit {
    /// Creates a habit with a generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name)
    }

    pub fn with_id(id: HabitId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn validate(&self) -> Result<(), HabitValidationError> {
        if self.name.trim().is_empty() {
            return Err(HabitValidationError::EmptyName(self.id));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HabitValidationError {
    EmptyName(HabitId),
}

impl Display for HabitValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName(id) => write!(f, "habit {id} has empty name"),
        }
    }
}

impl Error for HabitValidationError {}

/// Resolves selected ids to the habits' current names.
///
/// Ids without a matching habit resolve to an empty string so the
/// resulting list keeps one slot per selected id.
pub fn resolve_habit_names(habits: &[Habit], ids: &[HabitId]) -> Vec<String> {
    ids.iter()
        .map(|id| {
            habits
                .iter()
                .find(|habit| habit.id == *id)
                .map(|habit| habit.name.clone())
                .unwrap_or_default()
        })
        .collect()
}

/// Reverse lookup from stored names to the ids of habits currently
/// carrying those names, in habit collection order.
///
/// Lossy: a renamed or deleted habit no longer matches.
pub fn habit_ids_for_names(habits: &[Habit], names: &[String]) -> Vec<HabitId> {
    habits
        .iter()
        .filter(|habit| names.iter().any(|name| *name == habit.name))
        .map(|habit| habit.id)
        .collect()
}

/// Ordered set of habit ids picked in a compose or edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HabitSelection {
    ids: Vec<HabitId>,
}

impl HabitSelection {
    pub fn from_ids(ids: impl IntoIterator<Item = HabitId>) -> Self {
        let mut selection = Self::default();
        for id in ids {
            if !selection.contains(id) {
                selection.ids.push(id);
            }
        }
        selection
    }

    /// Flips membership of `id`. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, id: HabitId) -> bool {
        if let Some(position) = self.ids.iter().position(|selected| *selected == id) {
            self.ids.remove(position);
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    pub fn contains(&self, id: HabitId) -> bool {
        self.ids.contains(&id)
    }

    pub fn remove(&mut self, id: HabitId) {
        self.ids.retain(|selected| *selected != id);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn ids(&self) -> &[HabitId] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Days each habit was completed, keyed by habit id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionLog {
    days: BTreeMap<HabitId, Vec<String>>,
}

impl CompletionLog {
    /// Appends `date` unless already recorded. Returns whether it was added.
    pub fn mark(&mut self, habit_id: HabitId, date: impl Into<String>) -> bool {
        let date = date.into();
        let days = self.days.entry(habit_id).or_default();
        if days.contains(&date) {
            return false;
        }
        days.push(date);
        true
    }

    pub fn contains(&self, habit_id: HabitId, date: &str) -> bool {
        self.days
            .get(&habit_id)
            .is_some_and(|days| days.iter().any(|day| day == date))
    }

    /// Recorded dates in insertion order; empty when never completed.
    pub fn dates(&self, habit_id: HabitId) -> &[String] {
        self.days.get(&habit_id).map_or(&[], Vec::as_slice)
    }

    pub fn remove_habit(&mut self, habit_id: HabitId) {
        self.days.remove(&habit_id);
    }
}
