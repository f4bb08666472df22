//! Connection bootstrap behind `SqliteKvStore`.
//!
//! Connections handed out here are migrated to `migrations::latest_version`
//! and stamped through `PRAGMA user_version`. A file stamped by a newer
//! build is refused rather than read.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    /// The store file (or in-memory store) could not be opened.
    Open {
        location: String,
        source: rusqlite::Error,
    },
    /// A pragma, migration or statement failed on an open connection.
    Sqlite(rusqlite::Error),
    /// The store was stamped by a newer build.
    SchemaTooNew { found: u32, supported: u32 },
}

impl DbError {
    /// Whether retrying with this binary can never succeed.
    pub fn is_schema_too_new(&self) -> bool {
        matches!(self, Self::SchemaTooNew { .. })
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { location, source } => {
                write!(f, "cannot open store at `{location}`: {source}")
            }
            Self::Sqlite(err) => write!(f, "store query failed: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "store schema v{found} was written by a newer build (this build reads up to v{supported})"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
