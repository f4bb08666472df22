//! Journal/tracker session service.
//!
//! # Responsibility
//! - Hold entries, habits, completion log, theme and transient form/filter
//!   state for one session.
//! - Expose the command handlers a UI invokes, one mutation per call.
//!
//! # Invariants
//! - Entry ids are unique and strictly increasing in creation order.
//! - New entries are prepended (most-recent-first).
//! - Every change to entries, habits or theme is written back before the
//!   command returns; completion logs only when configured.
//! - A failed write leaves the in-memory state as it was before the command.
//! - Filter commands never remove stored entries.
//! - Blank input and unknown ids degrade to no-ops.

use crate::clock::{format_day, Clock, SystemClock};
use crate::config::{CoreConfig, StoreKeys};
use crate::model::entry::{Entry, EntryId, Mood};
use crate::model::habit::{
    habit_ids_for_names, resolve_habit_names, CompletionLog, Habit, HabitId, HabitSelection,
};
use crate::model::theme::Theme;
use crate::persist::{load_state, save};
use crate::service::draft::{ComposeDraft, EditDraft, SelectionScope};
use crate::store::{KeyValueStore, StoreResult};
use crate::view::filter::{apply_filter, entry_stats, EntryStats, FilterState};
use crate::view::streak::streak;
use log::{debug, info, warn};

/// In-memory state of one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JournalState {
    /// Most-recent-first.
    pub entries: Vec<Entry>,
    pub habits: Vec<Habit>,
    pub completions: CompletionLog,
    pub theme: Theme,
    pub compose: ComposeDraft,
    pub edit: Option<EditDraft>,
    pub filter: FilterState,
}

/// State container plus command handlers over a key-value store.
pub struct JournalService<S: KeyValueStore, C: Clock = SystemClock> {
    store: S,
    clock: C,
    config: CoreConfig,
    keys: StoreKeys,
    state: JournalState,
}

impl<S: KeyValueStore> JournalService<S, SystemClock> {
    /// Loads a session using the wall clock.
    pub fn open(store: S, config: CoreConfig) -> Self {
        Self::load(store, SystemClock, config)
    }
}

impl<S: KeyValueStore, C: Clock> JournalService<S, C> {
    /// Loads persisted state from `store`. Never fails; unreadable values
    /// start out empty.
    pub fn load(store: S, clock: C, config: CoreConfig) -> Self {
        let keys = config.store_keys();
        let persisted = load_state(&store, &keys, config.persist_completions);
        info!(
            "event=session_load module=service status=ok profile={} entries={} habits={} theme={}",
            config.profile.as_str(),
            persisted.entries.len(),
            persisted.habits.len(),
            persisted.theme.as_str()
        );

        Self {
            store,
            clock,
            config,
            keys,
            state: JournalState {
                entries: persisted.entries,
                habits: persisted.habits,
                completions: persisted.completions,
                theme: persisted.theme,
                ..JournalState::default()
            },
        }
    }

    pub fn state(&self) -> &JournalState {
        &self.state
    }

    pub fn entries(&self) -> &[Entry] {
        &self.state.entries
    }

    pub fn habits(&self) -> &[Habit] {
        &self.state.habits
    }

    pub fn completions(&self) -> &CompletionLog {
        &self.state.completions
    }

    pub fn theme(&self) -> Theme {
        self.state.theme
    }

    pub fn filter(&self) -> &FilterState {
        &self.state.filter
    }

    pub fn compose(&self) -> &ComposeDraft {
        &self.state.compose
    }

    pub fn edit_draft(&self) -> Option<&EditDraft> {
        self.state.edit.as_ref()
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Today's date as stored on entries and completion logs.
    pub fn today_label(&self) -> String {
        format_day(self.clock.today(), &self.config.date_format)
    }

    // --- entries ---

    /// Creates an entry dated today and prepends it.
    ///
    /// Returns `Ok(None)` without touching state when `text` is blank.
    /// Selected ids that match no habit are stored as empty names.
    pub fn add_entry(
        &mut self,
        text: &str,
        mood: Mood,
        selected_habits: &[HabitId],
    ) -> StoreResult<Option<Entry>> {
        let text = text.trim();
        if text.is_empty() {
            debug!("event=entry_add module=service status=skipped reason=blank_text");
            return Ok(None);
        }

        let entry = Entry::new(
            self.next_entry_id(),
            text,
            mood,
            self.today_label(),
            resolve_habit_names(&self.state.habits, selected_habits),
        );
        self.write_through(|service| {
            service.state.entries.insert(0, entry.clone());
            service.persist_entries()
        })?;

        info!(
            "event=entry_add module=service status=ok entry_id={} habits={}",
            entry.id,
            entry.habits.len()
        );
        Ok(Some(entry))
    }

    pub fn set_compose_text(&mut self, text: impl Into<String>) {
        self.state.compose.text = text.into();
    }

    pub fn set_compose_mood(&mut self, mood: Mood) {
        self.state.compose.mood = mood;
    }

    /// Adds the compose draft as an entry, then clears its text and
    /// selection. The picked mood is kept for the next entry.
    pub fn submit_compose(&mut self) -> StoreResult<Option<Entry>> {
        let draft = self.state.compose.clone();
        let added = self.add_entry(&draft.text, draft.mood, draft.selection.ids())?;
        if added.is_some() {
            self.state.compose.text.clear();
            self.state.compose.selection.clear();
        }
        Ok(added)
    }

    /// Removes the entry with `id`. Returns `false` when nothing matched.
    pub fn delete_entry(&mut self, id: EntryId) -> StoreResult<bool> {
        if !self.state.entries.iter().any(|entry| entry.id == id) {
            debug!("event=entry_delete module=service status=skipped entry_id={id} reason=not_found");
            return Ok(false);
        }

        self.write_through(|service| {
            service.state.entries.retain(|entry| entry.id != id);
            if service.state.edit.as_ref().is_some_and(|draft| draft.id == id) {
                service.state.edit = None;
            }
            service.persist_entries()
        })?;

        info!("event=entry_delete module=service status=ok entry_id={id}");
        Ok(true)
    }

    /// Opens an edit draft seeded from the stored entry.
    ///
    /// Habits are pre-selected by matching stored names against current
    /// habit names, so renamed or deleted habits come back unselected.
    pub fn start_edit(&mut self, id: EntryId) -> Option<EditDraft> {
        let entry = self.state.entries.iter().find(|entry| entry.id == id)?;
        let draft = EditDraft {
            id,
            text: entry.text.clone(),
            mood: entry.mood,
            selection: HabitSelection::from_ids(habit_ids_for_names(
                &self.state.habits,
                &entry.habits,
            )),
        };
        self.state.edit = Some(draft.clone());
        Some(draft)
    }

    /// Returns `false` when no edit is open.
    pub fn set_edit_text(&mut self, text: impl Into<String>) -> bool {
        match self.state.edit.as_mut() {
            Some(draft) => {
                draft.text = text.into();
                true
            }
            None => false,
        }
    }

    /// Returns `false` when no edit is open.
    pub fn set_edit_mood(&mut self, mood: Mood) -> bool {
        match self.state.edit.as_mut() {
            Some(draft) => {
                draft.mood = mood;
                true
            }
            None => false,
        }
    }

    /// Writes the open draft back onto its entry and closes the draft.
    ///
    /// A blank draft text keeps the draft open and changes nothing. If the
    /// entry is gone, the draft is discarded.
    pub fn save_edit(&mut self) -> StoreResult<Option<Entry>> {
        let Some(draft) = self.state.edit.as_ref() else {
            return Ok(None);
        };
        let text = draft.text.trim().to_string();
        if text.is_empty() {
            debug!(
                "event=entry_edit module=service status=skipped entry_id={} reason=blank_text",
                draft.id
            );
            return Ok(None);
        }

        let id = draft.id;
        let mood = draft.mood;
        let habits = resolve_habit_names(&self.state.habits, draft.selection.ids());
        let Some(index) = self.state.entries.iter().position(|entry| entry.id == id) else {
            debug!("event=entry_edit module=service status=skipped entry_id={id} reason=not_found");
            self.state.edit = None;
            return Ok(None);
        };

        // On a failed write the draft reopens with the user's edits intact.
        let saved = self.write_through(|service| {
            service.state.edit = None;
            let entry = &mut service.state.entries[index];
            entry.text = text;
            entry.mood = mood;
            entry.habits = habits;
            let saved = entry.clone();
            service.persist_entries()?;
            Ok(saved)
        })?;

        info!("event=entry_edit module=service status=ok entry_id={id}");
        Ok(Some(saved))
    }

    pub fn cancel_edit(&mut self) {
        self.state.edit = None;
    }

    // --- habits ---

    /// Appends a habit. Returns `Ok(None)` when `name` is blank.
    pub fn add_habit(&mut self, name: &str) -> StoreResult<Option<Habit>> {
        let name = name.trim();
        if name.is_empty() {
            debug!("event=habit_add module=service status=skipped reason=blank_name");
            return Ok(None);
        }

        let habit = Habit::new(name);
        self.write_through(|service| {
            service.state.habits.push(habit.clone());
            service.persist_habits()
        })?;

        info!("event=habit_add module=service status=ok habit_id={}", habit.id);
        Ok(Some(habit))
    }

    /// Renames a habit. Entries saved earlier keep the old name.
    pub fn rename_habit(&mut self, id: HabitId, name: &str) -> StoreResult<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(false);
        }
        let Some(index) = self.state.habits.iter().position(|habit| habit.id == id) else {
            debug!("event=habit_rename module=service status=skipped habit_id={id} reason=not_found");
            return Ok(false);
        };
        self.write_through(|service| {
            service.state.habits[index].name = name.to_string();
            service.persist_habits()
        })?;

        info!("event=habit_rename module=service status=ok habit_id={id}");
        Ok(true)
    }

    /// Deletes a habit with its completion log and drops it from both
    /// selections. Entries saved earlier keep the name.
    pub fn delete_habit(&mut self, id: HabitId) -> StoreResult<bool> {
        if !self.state.habits.iter().any(|habit| habit.id == id) {
            debug!("event=habit_delete module=service status=skipped habit_id={id} reason=not_found");
            return Ok(false);
        }

        self.write_through(|service| {
            service.state.habits.retain(|habit| habit.id != id);
            service.state.completions.remove_habit(id);
            service.state.compose.selection.remove(id);
            if let Some(draft) = service.state.edit.as_mut() {
                draft.selection.remove(id);
            }
            service.persist_habits()?;
            if service.config.persist_completions {
                service.persist_completions()?;
            }
            Ok(())
        })?;

        info!("event=habit_delete module=service status=ok habit_id={id}");
        Ok(true)
    }

    /// Flips `id` in the compose or edit selection. Returns whether the
    /// habit is selected afterwards; `false` for `Edit` with no open draft.
    pub fn toggle_selection(&mut self, scope: SelectionScope, id: HabitId) -> bool {
        match scope {
            SelectionScope::Compose => self.state.compose.selection.toggle(id),
            SelectionScope::Edit => self
                .state
                .edit
                .as_mut()
                .is_some_and(|draft| draft.selection.toggle(id)),
        }
    }

    /// Replaces the compose or edit selection with `ids`, deduplicated in
    /// order. Returns `false` for `Edit` with no open draft.
    pub fn replace_selection(&mut self, scope: SelectionScope, ids: &[HabitId]) -> bool {
        let selection = HabitSelection::from_ids(ids.iter().copied());
        match scope {
            SelectionScope::Compose => {
                self.state.compose.selection = selection;
                true
            }
            SelectionScope::Edit => match self.state.edit.as_mut() {
                Some(draft) => {
                    draft.selection = selection;
                    true
                }
                None => false,
            },
        }
    }

    /// Records today for `habit_id`. Returns `false` when the habit is
    /// unknown or today is already recorded.
    pub fn mark_complete(&mut self, habit_id: HabitId) -> StoreResult<bool> {
        if !self.state.habits.iter().any(|habit| habit.id == habit_id) {
            debug!("event=habit_complete module=service status=skipped habit_id={habit_id} reason=not_found");
            return Ok(false);
        }

        let today = self.today_label();
        if self.state.completions.contains(habit_id, &today) {
            return Ok(false);
        }
        self.write_through(|service| {
            service.state.completions.mark(habit_id, today);
            if service.config.persist_completions {
                service.persist_completions()?;
            }
            Ok(())
        })?;

        info!(
            "event=habit_complete module=service status=ok habit_id={habit_id} streak={}",
            self.streak(habit_id)
        );
        Ok(true)
    }

    /// Consecutive completed days ending today.
    pub fn streak(&self, habit_id: HabitId) -> u32 {
        streak(
            self.state.completions.dates(habit_id),
            self.clock.today(),
            &self.config.date_format,
        )
    }

    // --- filters ---

    pub fn set_search_text(&mut self, search_text: impl Into<String>) {
        self.state.filter.search_text = search_text.into();
    }

    pub fn set_date_filter(&mut self, date: Option<String>) {
        self.state.filter.date_filter = date.filter(|value| !value.trim().is_empty());
    }

    /// Narrows the view to `mood` and clears search/date filters.
    ///
    /// View-only: stored entries are left untouched.
    pub fn filter_by_mood(&mut self, mood: Mood) {
        self.state.filter = FilterState {
            mood: Some(mood),
            ..FilterState::default()
        };
    }

    pub fn clear_filters(&mut self) {
        self.state.filter = FilterState::default();
    }

    /// Entries passing the current filters, most recent first.
    pub fn visible_entries(&self) -> Vec<&Entry> {
        apply_filter(&self.state.entries, &self.state.filter)
    }

    pub fn stats(&self) -> EntryStats {
        entry_stats(&self.state.entries)
    }

    // --- theme ---

    pub fn set_theme(&mut self, theme: Theme) -> StoreResult<()> {
        self.write_through(|service| {
            service.state.theme = theme;
            save(&service.store, &service.keys.theme, &service.state.theme)
        })?;
        info!("event=theme_set module=service status=ok theme={}", theme.as_str());
        Ok(())
    }

    pub fn toggle_theme(&mut self) -> StoreResult<Theme> {
        let next = self.state.theme.toggled();
        self.set_theme(next)?;
        Ok(next)
    }

    fn next_entry_id(&self) -> EntryId {
        let now = self.clock.now_millis();
        let floor = self
            .state
            .entries
            .iter()
            .map(|entry| entry.id.0.saturating_add(1))
            .max();
        EntryId(floor.map_or(now, |floor| now.max(floor)))
    }

    /// Applies `change` and writes it back. When the write fails, the state
    /// from before `change` is restored and the error is returned.
    fn write_through<T>(
        &mut self,
        change: impl FnOnce(&mut Self) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let before = self.state.clone();
        let result = change(self);
        if let Err(err) = &result {
            warn!("event=store_write module=service status=rolled_back error={err}");
            self.state = before;
        }
        result
    }

    fn persist_entries(&self) -> StoreResult<()> {
        save(&self.store, &self.keys.entries, &self.state.entries)
    }

    fn persist_habits(&self) -> StoreResult<()> {
        save(&self.store, &self.keys.habits, &self.state.habits)
    }

    fn persist_completions(&self) -> StoreResult<()> {
        save(&self.store, &self.keys.completions, &self.state.completions)
    }
}

#[cfg(test)]
mod tests {
    use super::JournalService;
    use crate::clock::FixedClock;
    use crate::config::CoreConfig;
    use crate::model::entry::{EntryId, Mood};
    use crate::store::MemoryKvStore;
    use chrono::NaiveDate;

    fn service() -> (JournalService<MemoryKvStore, FixedClock>, FixedClock) {
        let clock = FixedClock::at_date(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        let service = JournalService::load(MemoryKvStore::new(), clock.clone(), CoreConfig::default());
        (service, clock)
    }

    #[test]
    fn ids_stay_unique_when_clock_does_not_advance() {
        let (mut service, _clock) = service();
        let first = service.add_entry("one", Mood::Happy, &[]).unwrap().unwrap();
        let second = service.add_entry("two", Mood::Happy, &[]).unwrap().unwrap();

        assert_eq!(second.id, EntryId(first.id.0 + 1));
    }

    #[test]
    fn ids_follow_clock_when_it_moves_forward() {
        let (mut service, clock) = service();
        let first = service.add_entry("one", Mood::Happy, &[]).unwrap().unwrap();
        clock.advance_millis(250);
        let second = service.add_entry("two", Mood::Happy, &[]).unwrap().unwrap();

        assert_eq!(second.id, EntryId(first.id.0 + 250));
    }

    #[test]
    fn today_label_uses_configured_format() {
        let (service, _clock) = service();
        assert_eq!(service.today_label(), "10/19/2026");
    }
}
