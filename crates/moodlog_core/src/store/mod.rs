//! Key-value store contracts and implementations.
//!
//! # Responsibility
//! - Define the opaque `get`/`set` storage seam the persistence bridge uses.
//! - Keep SQL details inside the SQLite adapter.
//!
//! # Invariants
//! - Writes are whole-value overwrites; there are no partial updates.
//! - An absent key reads as `None`, never as an error.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory_store;
pub mod sqlite_store;

pub use memory_store::MemoryKvStore;
pub use sqlite_store::SqliteKvStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Transport or encoding failure while talking to a key-value store.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// A value could not be encoded before writing.
    Encode {
        key: String,
        source: serde_json::Error,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode { key, source } => write!(f, "failed to encode value for `{key}`: {source}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode { source, .. } => Some(source),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Opaque per-application key-value storage.
pub trait KeyValueStore {
    /// Reads the raw value stored under `key`.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    /// Overwrites the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }
}
