//! FFI use-case API for the journal/tracker UI.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Own the single process-wide session the UI thread drives.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every call runs to completion under the session lock.
//! - Ids cross the boundary as `i64` (entries) and UUID strings (habits).

use log::{error, info};
use moodlog_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    CoreConfig, Entry, EntryId, Habit, HabitId, JournalService, Mood, SelectionScope,
    SqliteKvStore, Theme,
};
use std::path::PathBuf;
use std::sync::Mutex;
use uuid::Uuid;

const SESSION_DB_FILE_NAME: &str = "moodlog_session.sqlite3";
const SESSION_DB_PATH_ENV: &str = "MOODLOG_DB_PATH";

type Session = JournalService<SqliteKvStore>;

static SESSION: Mutex<Option<Session>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Opens (or replaces) the process session over the store file at `db_path`.
///
/// `config_json` is a `CoreConfig` JSON object; empty means defaults.
///
/// # FFI contract
/// - Returns empty string on success and error message on failure.
/// - On failure the previous session stays active.
#[flutter_rust_bridge::frb(sync)]
pub fn session_open(db_path: String, config_json: String) -> String {
    let config = if config_json.trim().is_empty() {
        CoreConfig::default()
    } else {
        match CoreConfig::from_json_str(&config_json) {
            Ok(config) => config,
            Err(err) => return format!("session_open failed: {err}"),
        }
    };

    let session = match open_session(PathBuf::from(db_path.trim()), config) {
        Ok(session) => session,
        Err(err) => return err,
    };
    match SESSION.lock() {
        Ok(mut guard) => {
            *guard = Some(session);
            String::new()
        }
        Err(_) => "session_open failed: session lock poisoned".to_string(),
    }
}

/// Entry projection returned to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryItem {
    /// Creation-time id in epoch milliseconds.
    pub id: i64,
    pub text: String,
    /// Mood emoji.
    pub mood: String,
    pub date: String,
    pub habits: Vec<String>,
}

/// Envelope for entry commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryActionResponse {
    /// Whether the command ran. A blank-input no-op still counts as ok.
    pub ok: bool,
    /// Entry after the command, when one was created or changed.
    pub entry: Option<EntryItem>,
    pub message: String,
}

impl EntryActionResponse {
    fn changed(message: impl Into<String>, entry: &Entry) -> Self {
        Self {
            ok: true,
            entry: Some(to_entry_item(entry)),
            message: message.into(),
        }
    }

    fn unchanged(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            entry: None,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            entry: None,
            message: message.into(),
        }
    }
}

/// Filtered entry list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryListResponse {
    /// Visible entries, most recent first.
    pub items: Vec<EntryItem>,
    /// Size of the stored collection, ignoring filters.
    pub total: u32,
    pub message: String,
}

/// Per-mood count for the stats footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodCount {
    pub mood: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryStatsResponse {
    pub total: u32,
    pub by_mood: Vec<MoodCount>,
    pub message: String,
}

/// Habit projection with derived streak.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitItem {
    pub id: String,
    pub name: String,
    pub streak: u32,
    pub completed_today: bool,
}

/// Envelope for habit commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitActionResponse {
    pub ok: bool,
    pub habit: Option<HabitItem>,
    pub message: String,
}

impl HabitActionResponse {
    fn changed(message: impl Into<String>, habit: HabitItem) -> Self {
        Self {
            ok: true,
            habit: Some(habit),
            message: message.into(),
        }
    }

    fn unchanged(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            habit: None,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            habit: None,
            message: message.into(),
        }
    }
}

/// Adds an entry dated today.
///
/// `mood` accepts the emoji or its name; `habit_ids` are habit UUIDs.
/// Unparseable or unknown habit ids are kept as empty habit names.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_add(text: String, mood: String, habit_ids: Vec<String>) -> EntryActionResponse {
    let Some(mood) = Mood::parse(&mood) else {
        return EntryActionResponse::failure(format!("entry_add failed: unknown mood `{mood}`"));
    };
    let habit_ids = parse_habit_ids(&habit_ids);

    match with_session(|session| {
        session
            .add_entry(&text, mood, &habit_ids)
            .map_err(|err| err.to_string())
    }) {
        Ok(Some(entry)) => EntryActionResponse::changed("Entry added.", &entry),
        Ok(None) => EntryActionResponse::unchanged("Entry text is blank; nothing added."),
        Err(err) => EntryActionResponse::failure(format!("entry_add failed: {err}")),
    }
}

/// Deletes an entry. Unknown ids are a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_delete(entry_id: i64) -> EntryActionResponse {
    match with_session(|session| {
        session
            .delete_entry(EntryId(entry_id))
            .map_err(|err| err.to_string())
    }) {
        Ok(true) => EntryActionResponse::unchanged("Entry deleted."),
        Ok(false) => EntryActionResponse::unchanged("Entry not found; nothing deleted."),
        Err(err) => EntryActionResponse::failure(format!("entry_delete failed: {err}")),
    }
}

/// Replaces text, mood and habits of an existing entry in one call.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_edit(
    entry_id: i64,
    text: String,
    mood: String,
    habit_ids: Vec<String>,
) -> EntryActionResponse {
    let Some(mood) = Mood::parse(&mood) else {
        return EntryActionResponse::failure(format!("entry_edit failed: unknown mood `{mood}`"));
    };
    let habit_ids = parse_habit_ids(&habit_ids);

    match with_session(|session| {
        if session.start_edit(EntryId(entry_id)).is_none() {
            return Ok(None);
        }
        session.set_edit_text(text.as_str());
        session.set_edit_mood(mood);
        session.replace_selection(SelectionScope::Edit, &habit_ids);
        let saved = session.save_edit().map_err(|err| err.to_string());
        // A blank edit leaves the draft open; this call owns the whole edit.
        session.cancel_edit();
        saved
    }) {
        Ok(Some(entry)) => EntryActionResponse::changed("Entry updated.", &entry),
        Ok(None) => EntryActionResponse::unchanged("Entry not found or text blank; nothing saved."),
        Err(err) => EntryActionResponse::failure(format!("entry_edit failed: {err}")),
    }
}

/// Lists entries matching search text, exact date and mood.
///
/// Filters are view-only; the stored collection is never reduced.
#[flutter_rust_bridge::frb(sync)]
pub fn entries_list(
    search_text: String,
    date_filter: Option<String>,
    mood: Option<String>,
) -> EntryListResponse {
    let mood = match mood.filter(|value| !value.trim().is_empty()) {
        Some(raw) => match Mood::parse(&raw) {
            Some(mood) => Some(mood),
            None => {
                return EntryListResponse {
                    items: Vec::new(),
                    total: 0,
                    message: format!("entries_list failed: unknown mood `{raw}`"),
                };
            }
        },
        None => None,
    };

    let listed = with_session(|session| {
        session.clear_filters();
        if let Some(mood) = mood {
            session.filter_by_mood(mood);
        }
        session.set_search_text(search_text);
        session.set_date_filter(date_filter);
        let items = session
            .visible_entries()
            .into_iter()
            .map(to_entry_item)
            .collect::<Vec<_>>();
        Ok((items, to_u32(session.entries().len())))
    });

    match listed {
        Ok((items, total)) => {
            let message = if items.is_empty() {
                "No entries.".to_string()
            } else {
                format!("Showing {} of {} entries.", items.len(), total)
            };
            EntryListResponse {
                items,
                total,
                message,
            }
        }
        Err(err) => EntryListResponse {
            items: Vec::new(),
            total: 0,
            message: format!("entries_list failed: {err}"),
        },
    }
}

/// Collection totals, overall and per mood.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_stats() -> EntryStatsResponse {
    match with_session(|session| Ok(session.stats())) {
        Ok(stats) => EntryStatsResponse {
            total: to_u32(stats.total),
            by_mood: stats
                .by_mood
                .into_iter()
                .map(|(mood, count)| MoodCount {
                    mood: mood.emoji().to_string(),
                    count: to_u32(count),
                })
                .collect(),
            message: String::new(),
        },
        Err(err) => EntryStatsResponse {
            total: 0,
            by_mood: Vec::new(),
            message: format!("entry_stats failed: {err}"),
        },
    }
}

/// Adds a habit. Blank names are a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn habit_add(name: String) -> HabitActionResponse {
    match with_session(|session| {
        let added = session.add_habit(&name).map_err(|err| err.to_string())?;
        let session: &Session = session;
        Ok(added.map(|habit| to_habit_item(session, &habit)))
    }) {
        Ok(Some(habit)) => HabitActionResponse::changed("Habit added.", habit),
        Ok(None) => HabitActionResponse::unchanged("Habit name is blank; nothing added."),
        Err(err) => HabitActionResponse::failure(format!("habit_add failed: {err}")),
    }
}

/// Renames a habit; entries keep the name they were saved with.
#[flutter_rust_bridge::frb(sync)]
pub fn habit_rename(habit_id: String, name: String) -> HabitActionResponse {
    let Some(id) = parse_habit_id(&habit_id) else {
        return HabitActionResponse::failure(format!("habit_rename failed: invalid id `{habit_id}`"));
    };
    match with_session(|session| {
        if !session.rename_habit(id, &name).map_err(|err| err.to_string())? {
            return Ok(None);
        }
        Ok(find_habit_item(session, id))
    }) {
        Ok(Some(habit)) => HabitActionResponse::changed("Habit renamed.", habit),
        Ok(None) => HabitActionResponse::unchanged("Habit not found or name blank; nothing renamed."),
        Err(err) => HabitActionResponse::failure(format!("habit_rename failed: {err}")),
    }
}

/// Deletes a habit and its completion log.
#[flutter_rust_bridge::frb(sync)]
pub fn habit_delete(habit_id: String) -> HabitActionResponse {
    let Some(id) = parse_habit_id(&habit_id) else {
        return HabitActionResponse::failure(format!("habit_delete failed: invalid id `{habit_id}`"));
    };
    match with_session(|session| session.delete_habit(id).map_err(|err| err.to_string())) {
        Ok(true) => HabitActionResponse::unchanged("Habit deleted."),
        Ok(false) => HabitActionResponse::unchanged("Habit not found; nothing deleted."),
        Err(err) => HabitActionResponse::failure(format!("habit_delete failed: {err}")),
    }
}

/// Marks a habit complete for today. Repeated calls the same day are no-ops.
#[flutter_rust_bridge::frb(sync)]
pub fn habit_mark_complete(habit_id: String) -> HabitActionResponse {
    let Some(id) = parse_habit_id(&habit_id) else {
        return HabitActionResponse::failure(format!(
            "habit_mark_complete failed: invalid id `{habit_id}`"
        ));
    };
    match with_session(|session| {
        let marked = session.mark_complete(id).map_err(|err| err.to_string())?;
        Ok((marked, find_habit_item(session, id)))
    }) {
        Ok((true, Some(habit))) => HabitActionResponse::changed("Habit completed.", habit),
        Ok((false, Some(habit))) => HabitActionResponse::changed("Already completed today.", habit),
        Ok((_, None)) => HabitActionResponse::unchanged("Habit not found."),
        Err(err) => HabitActionResponse::failure(format!("habit_mark_complete failed: {err}")),
    }
}

/// All habits with current streaks, in creation order.
///
/// Returns an empty list when the session cannot be opened.
#[flutter_rust_bridge::frb(sync)]
pub fn habits_list() -> Vec<HabitItem> {
    with_session(|session| {
        let session: &Session = session;
        Ok(session
            .habits()
            .iter()
            .map(|habit| to_habit_item(session, habit))
            .collect())
    })
    .unwrap_or_default()
}

/// Active theme name (`light|dark`); `light` when the session is unavailable.
#[flutter_rust_bridge::frb(sync)]
pub fn theme_get() -> String {
    with_session(|session| Ok(session.theme()))
        .unwrap_or_default()
        .as_str()
        .to_string()
}

/// Sets and persists the theme. Returns empty string on success.
#[flutter_rust_bridge::frb(sync)]
pub fn theme_set(theme: String) -> String {
    let Some(theme) = Theme::parse(&theme) else {
        return format!("theme_set failed: unknown theme `{theme}`");
    };
    match with_session(|session| session.set_theme(theme).map_err(|err| err.to_string())) {
        Ok(()) => String::new(),
        Err(err) => format!("theme_set failed: {err}"),
    }
}

fn with_session<T>(f: impl FnOnce(&mut Session) -> Result<T, String>) -> Result<T, String> {
    let mut guard = SESSION
        .lock()
        .map_err(|_| "session lock poisoned".to_string())?;
    if guard.is_none() {
        *guard = Some(open_session(resolve_default_db_path(), CoreConfig::default())?);
    }
    match guard.as_mut() {
        Some(session) => f(session),
        None => Err("session unavailable".to_string()),
    }
}

fn open_session(db_path: PathBuf, config: CoreConfig) -> Result<Session, String> {
    let store = SqliteKvStore::open(&db_path).map_err(|err| {
        error!("event=session_open module=ffi status=error error={err}");
        format!("session store open failed: {err}")
    })?;
    info!(
        "event=session_open module=ffi status=ok profile={}",
        config.profile.as_str()
    );
    Ok(JournalService::open(store, config))
}

fn resolve_default_db_path() -> PathBuf {
    if let Ok(raw) = std::env::var(SESSION_DB_PATH_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(SESSION_DB_FILE_NAME)
}

fn parse_habit_id(raw: &str) -> Option<HabitId> {
    Uuid::parse_str(raw.trim()).ok()
}

fn parse_habit_ids(raw: &[String]) -> Vec<HabitId> {
    // The nil id never matches a habit, so it resolves to an empty name.
    raw.iter()
        .map(|value| parse_habit_id(value).unwrap_or(Uuid::nil()))
        .collect()
}

fn to_entry_item(entry: &Entry) -> EntryItem {
    EntryItem {
        id: entry.id.0,
        text: entry.text.clone(),
        mood: entry.mood.emoji().to_string(),
        date: entry.date.clone(),
        habits: entry.habits.clone(),
    }
}

fn to_habit_item(session: &Session, habit: &Habit) -> HabitItem {
    HabitItem {
        id: habit.id.to_string(),
        name: habit.name.clone(),
        streak: session.streak(habit.id),
        completed_today: session
            .completions()
            .contains(habit.id, &session.today_label()),
    }
}

fn find_habit_item(session: &Session, id: HabitId) -> Option<HabitItem> {
    session
        .habits()
        .iter()
        .find(|habit| habit.id == id)
        .map(|habit| to_habit_item(session, habit))
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
