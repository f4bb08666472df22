use chrono::NaiveDate;
use moodlog_core::{
    CoreConfig, EntryId, FixedClock, JournalService, KeyValueStore, MemoryKvStore, Mood,
    SelectionScope,
};

fn session() -> (JournalService<MemoryKvStore, FixedClock>, FixedClock) {
    let clock = FixedClock::at_date(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
    let service = JournalService::load(MemoryKvStore::new(), clock.clone(), CoreConfig::default());
    (service, clock)
}

#[test]
fn add_entry_records_trimmed_text_mood_and_today() {
    let (mut service, _clock) = session();

    let entry = service
        .add_entry("  Good day  ", Mood::Happy, &[])
        .unwrap()
        .unwrap();

    assert_eq!(service.entries().len(), 1);
    assert_eq!(entry.text, "Good day");
    assert_eq!(entry.mood, Mood::Happy);
    assert_eq!(entry.date, "10/19/2026");
    assert!(entry.habits.is_empty());
}

#[test]
fn blank_text_leaves_collection_unchanged() {
    let (mut service, _clock) = session();
    service.add_entry("Good day", Mood::Happy, &[]).unwrap();

    let skipped = service.add_entry("  ", Mood::Sad, &[]).unwrap();

    assert!(skipped.is_none());
    assert_eq!(service.entries().len(), 1);
    assert_eq!(service.entries()[0].text, "Good day");
}

#[test]
fn newest_entry_is_listed_first() {
    let (mut service, clock) = session();
    let first = service.add_entry("first", Mood::Happy, &[]).unwrap().unwrap();
    clock.advance_millis(10);
    let second = service.add_entry("second", Mood::Sad, &[]).unwrap().unwrap();

    let ids: Vec<EntryId> = service.entries().iter().map(|entry| entry.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
    assert!(second.id > first.id);
}

#[test]
fn add_entry_writes_the_whole_collection() {
    let (mut service, _clock) = session();
    service.add_entry("persist me", Mood::Tired, &[]).unwrap();

    let raw = service.store().get("entries").unwrap().unwrap();
    let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored[0]["text"], "persist me");
    assert_eq!(stored[0]["mood"], "😴");
}

#[test]
fn delete_entry_twice_is_idempotent() {
    let (mut service, _clock) = session();
    let keep = service.add_entry("keep", Mood::Happy, &[]).unwrap().unwrap();
    let drop = service.add_entry("drop", Mood::Happy, &[]).unwrap().unwrap();

    assert!(service.delete_entry(drop.id).unwrap());
    assert!(!service.delete_entry(drop.id).unwrap());
    assert_eq!(service.entries().len(), 1);
    assert_eq!(service.entries()[0].id, keep.id);
}

#[test]
fn submit_compose_resets_text_and_selection_but_keeps_mood() {
    let (mut service, _clock) = session();
    let habit = service.add_habit("Exercise").unwrap().unwrap();

    service.set_compose_text("Ran 5k");
    service.set_compose_mood(Mood::Tired);
    service.toggle_selection(SelectionScope::Compose, habit.id);
    let entry = service.submit_compose().unwrap().unwrap();

    assert_eq!(entry.habits, vec!["Exercise".to_string()]);
    assert!(service.compose().text.is_empty());
    assert!(service.compose().selection.is_empty());
    assert_eq!(service.compose().mood, Mood::Tired);
}

#[test]
fn edit_replaces_text_mood_and_habits() {
    let (mut service, _clock) = session();
    let read = service.add_habit("Read").unwrap().unwrap();
    let walk = service.add_habit("Walk").unwrap().unwrap();
    let entry = service
        .add_entry("draft", Mood::Happy, &[read.id])
        .unwrap()
        .unwrap();

    let draft = service.start_edit(entry.id).unwrap();
    assert_eq!(draft.text, "draft");
    assert_eq!(draft.selection.ids(), &[read.id]);

    service.set_edit_text("  final  ");
    service.set_edit_mood(Mood::Thoughtful);
    service.toggle_selection(SelectionScope::Edit, read.id);
    service.toggle_selection(SelectionScope::Edit, walk.id);
    let saved = service.save_edit().unwrap().unwrap();

    assert_eq!(saved.id, entry.id);
    assert_eq!(saved.text, "final");
    assert_eq!(saved.mood, Mood::Thoughtful);
    assert_eq!(saved.habits, vec!["Walk".to_string()]);
    assert_eq!(saved.date, entry.date);
    assert!(service.edit_draft().is_none());
    assert_eq!(service.entries()[0], saved);
}

#[test]
fn edit_and_compose_selections_are_independent() {
    let (mut service, _clock) = session();
    let habit = service.add_habit("Read").unwrap().unwrap();
    let entry = service.add_entry("entry", Mood::Happy, &[]).unwrap().unwrap();

    service.start_edit(entry.id).unwrap();
    assert!(service.toggle_selection(SelectionScope::Edit, habit.id));

    assert!(service.compose().selection.is_empty());
    assert!(service.edit_draft().unwrap().selection.contains(habit.id));
}

#[test]
fn blank_edit_keeps_draft_open_and_entry_unchanged() {
    let (mut service, _clock) = session();
    let entry = service.add_entry("original", Mood::Happy, &[]).unwrap().unwrap();

    service.start_edit(entry.id).unwrap();
    service.set_edit_text("   ");

    assert!(service.save_edit().unwrap().is_none());
    assert!(service.edit_draft().is_some());
    assert_eq!(service.entries()[0].text, "original");
}

#[test]
fn edit_without_draft_or_unknown_entry_is_noop() {
    let (mut service, _clock) = session();
    assert!(service.start_edit(EntryId(42)).is_none());
    assert!(service.save_edit().unwrap().is_none());
    assert!(!service.set_edit_text("nothing open"));
    assert!(!service.toggle_selection(SelectionScope::Edit, uuid::Uuid::new_v4()));
}

#[test]
fn deleting_the_entry_under_edit_closes_the_draft() {
    let (mut service, _clock) = session();
    let entry = service.add_entry("short lived", Mood::Sad, &[]).unwrap().unwrap();

    service.start_edit(entry.id).unwrap();
    service.delete_entry(entry.id).unwrap();

    assert!(service.edit_draft().is_none());
    assert!(service.save_edit().unwrap().is_none());
    assert!(service.entries().is_empty());
}
