//! Core domain logic for MoodLog, the journal and mood/habit tracker.
//! This crate is the single source of truth for entry and habit invariants.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod persist;
pub mod service;
pub mod store;
pub mod view;

pub use clock::{format_day, try_format_day, Clock, FixedClock, SystemClock};
pub use config::{AppProfile, ConfigError, CoreConfig, StoreKeys, DEFAULT_DATE_FORMAT};
pub use logging::{default_log_level, init_logging, logging_status, LogSettings};
pub use model::entry::{Entry, EntryId, EntryValidationError, Mood};
pub use model::habit::{CompletionLog, Habit, HabitId, HabitSelection, HabitValidationError};
pub use model::theme::Theme;
pub use persist::PersistedState;
pub use service::draft::{ComposeDraft, EditDraft, SelectionScope};
pub use service::journal_service::{JournalService, JournalState};
pub use store::{KeyValueStore, MemoryKvStore, SqliteKvStore, StoreError, StoreResult};
pub use view::filter::{apply_filter, entry_stats, visible_entries, EntryStats, FilterState};
pub use view::streak::streak;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
