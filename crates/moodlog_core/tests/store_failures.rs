use chrono::NaiveDate;
use moodlog_core::{
    AppProfile, CoreConfig, FixedClock, JournalService, KeyValueStore, MemoryKvStore, Mood,
    SelectionScope, StoreResult, Theme,
};
use std::cell::Cell;

/// Memory store whose writes can be switched to fail.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryKvStore,
    reject_writes: Cell<bool>,
}

impl FlakyStore {
    fn reject_writes(&self, reject: bool) {
        self.reject_writes.set(reject);
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        if self.reject_writes.get() {
            return Err(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_FULL),
                Some("disk full".to_string()),
            )
            .into());
        }
        self.inner.set(key, value)
    }
}

fn session_with(config: CoreConfig) -> JournalService<FlakyStore, FixedClock> {
    let clock = FixedClock::at_date(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
    JournalService::load(FlakyStore::default(), clock, config)
}

fn session() -> JournalService<FlakyStore, FixedClock> {
    session_with(CoreConfig::default())
}

#[test]
fn failed_submit_keeps_draft_and_retry_adds_once() {
    let mut service = session();
    service.set_compose_text("Good day");
    service.set_compose_mood(Mood::Happy);
    service.store().reject_writes(true);

    assert!(service.submit_compose().is_err());
    assert!(service.submit_compose().is_err());
    assert!(service.entries().is_empty());
    assert_eq!(service.compose().text, "Good day");

    service.store().reject_writes(false);
    let entry = service.submit_compose().unwrap().unwrap();

    let texts: Vec<&str> = service.entries().iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["Good day"]);
    assert!(service.compose().text.is_empty());
    assert!(service.store().inner.raw("entries").unwrap().contains(&entry.id.to_string()));
}

#[test]
fn failed_edit_leaves_entry_and_reopens_draft() {
    let mut service = session();
    let entry = service.add_entry("before", Mood::Happy, &[]).unwrap().unwrap();
    service.start_edit(entry.id).unwrap();
    service.set_edit_text("after");
    service.set_edit_mood(Mood::Sad);
    service.store().reject_writes(true);

    assert!(service.save_edit().is_err());

    assert_eq!(service.entries()[0].text, "before");
    assert_eq!(service.entries()[0].mood, Mood::Happy);
    let draft = service.edit_draft().unwrap();
    assert_eq!(draft.text, "after");
    assert_eq!(draft.mood, Mood::Sad);
}

#[test]
fn failed_delete_keeps_entry() {
    let mut service = session();
    let entry = service.add_entry("keep me", Mood::Tired, &[]).unwrap().unwrap();
    service.store().reject_writes(true);

    assert!(service.delete_entry(entry.id).is_err());
    assert_eq!(service.entries().len(), 1);
}

#[test]
fn failed_habit_changes_are_undone() {
    let mut service = session_with(CoreConfig {
        persist_completions: true,
        ..CoreConfig::for_profile(AppProfile::Journal)
    });
    let habit = service.add_habit("Exercise").unwrap().unwrap();
    service.toggle_selection(SelectionScope::Compose, habit.id);
    service.store().reject_writes(true);

    assert!(service.add_habit("Read").is_err());
    assert!(service.rename_habit(habit.id, "Run").is_err());
    assert!(service.mark_complete(habit.id).is_err());
    assert!(service.delete_habit(habit.id).is_err());

    assert_eq!(service.habits().len(), 1);
    assert_eq!(service.habits()[0].name, "Exercise");
    assert!(service.completions().dates(habit.id).is_empty());
    assert!(service.compose().selection.contains(habit.id));

    service.store().reject_writes(false);
    assert!(service.mark_complete(habit.id).unwrap());
    assert_eq!(service.streak(habit.id), 1);
}

#[test]
fn failed_theme_write_keeps_previous_theme() {
    let mut service = session();
    service.store().reject_writes(true);

    assert!(service.toggle_theme().is_err());
    assert_eq!(service.theme(), Theme::Light);
    assert!(service.store().inner.raw("theme").is_none());
}
