//! Persistence bridge between session state and a key-value store.
//!
//! # Responsibility
//! - Load entries, habits, theme and (optionally) completion logs at startup.
//! - Serialize and overwrite one collection per mutation.
//!
//! # Invariants
//! - Loading never fails: absent, unreadable or malformed values fall back
//!   to defaults and are reported only through `warn!`.
//! - Records that parse but violate model invariants are dropped one by one.
//! - Writes are whole-value JSON overwrites.

use crate::config::StoreKeys;
use crate::model::entry::Entry;
use crate::model::habit::{CompletionLog, Habit};
use crate::model::theme::Theme;
use crate::store::{KeyValueStore, StoreError, StoreResult};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Everything read back from the store when a session starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedState {
    pub entries: Vec<Entry>,
    pub habits: Vec<Habit>,
    pub theme: Theme,
    pub completions: CompletionLog,
}

/// Reads all persisted collections, substituting defaults on any failure.
pub fn load_state<S: KeyValueStore>(
    store: &S,
    keys: &StoreKeys,
    load_completions: bool,
) -> PersistedState {
    let mut entries: Vec<Entry> = load_or_default(store, &keys.entries);
    entries.retain(|entry| match entry.validate() {
        Ok(()) => true,
        Err(err) => {
            warn!("event=state_load module=persist status=skipped key={} reason={err}", keys.entries);
            false
        }
    });

    let mut habits: Vec<Habit> = load_or_default(store, &keys.habits);
    habits.retain(|habit| match habit.validate() {
        Ok(()) => true,
        Err(err) => {
            warn!("event=state_load module=persist status=skipped key={} reason={err}", keys.habits);
            false
        }
    });

    let completions = if load_completions {
        load_or_default(store, &keys.completions)
    } else {
        CompletionLog::default()
    };

    PersistedState {
        entries,
        habits,
        theme: load_or_default(store, &keys.theme),
        completions,
    }
}

/// Decodes the JSON value at `key`, or `T::default()` when it is absent,
/// unreadable or malformed.
pub fn load_or_default<S, T>(store: &S, key: &str) -> T
where
    S: KeyValueStore,
    T: DeserializeOwned + Default,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("event=state_load module=persist status=absent key={key}");
            return T::default();
        }
        Err(err) => {
            warn!("event=state_load module=persist status=fallback key={key} error_code=store_read_failed error={err}");
            return T::default();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => {
            debug!("event=state_load module=persist status=ok key={key} bytes={}", raw.len());
            value
        }
        Err(err) => {
            // serde_json errors carry only line/column, never the payload.
            warn!("event=state_load module=persist status=fallback key={key} error_code=parse_failed error={err}");
            T::default()
        }
    }
}

/// Serializes `value` and overwrites `key`.
pub fn save<S, T>(store: &S, key: &str, value: &T) -> StoreResult<()>
where
    S: KeyValueStore,
    T: Serialize + ?Sized,
{
    let encoded = serde_json::to_string(value).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &encoded)?;
    debug!(
        "event=state_save module=persist status=ok key={key} bytes={}",
        encoded.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{load_or_default, load_state, save};
    use crate::config::AppProfile;
    use crate::model::entry::{Entry, EntryId, Mood};
    use crate::model::theme::Theme;
    use crate::store::MemoryKvStore;

    #[test]
    fn malformed_values_fall_back_to_defaults() {
        let store = MemoryKvStore::with_values([
            ("entries", "{not json"),
            ("theme", "\"sepia\""),
            ("habits", "42"),
        ]);
        let state = load_state(&store, &AppProfile::Tracker.store_keys(), true);

        assert!(state.entries.is_empty());
        assert!(state.habits.is_empty());
        assert_eq!(state.theme, Theme::Light);
    }

    #[test]
    fn invalid_records_are_dropped_individually() {
        let store = MemoryKvStore::with_values([(
            "entries",
            r#"[{"id":2,"text":"kept","mood":"😊","date":"1/2/2026"},{"id":1,"text":"   ","mood":"😢","date":"1/1/2026"}]"#,
        )]);
        let state = load_state(&store, &AppProfile::Tracker.store_keys(), false);

        assert_eq!(state.entries.len(), 1);
        assert_eq!(state.entries[0].text, "kept");
    }

    #[test]
    fn saved_entries_read_back_equal() {
        let store = MemoryKvStore::new();
        let entries = vec![
            Entry::new(EntryId(2), "Second", Mood::Angry, "10/19/2026", vec!["Read".into()]),
            Entry::new(EntryId(1), "First", Mood::Happy, "10/18/2026", Vec::new()),
        ];

        save(&store, "entries", &entries).unwrap();
        let loaded: Vec<Entry> = load_or_default(&store, "entries");

        assert_eq!(loaded, entries);
    }
}
