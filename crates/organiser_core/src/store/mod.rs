//! Persistent store: typed JSON slots over a durable key-value medium.
//!
//! # Responsibility
//! - Define the storage contract every collection and singleton sits on.
//! - Keep serialization and medium failures away from use-case callers.
//!
//! # Invariants
//! - A slot read never fails; absent or unparsable data yields the default.
//! - A failed write leaves the previously stored value untouched.
//! - Writes are synchronous: a later read in the same process sees them.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod kv;
mod slot;

pub use kv::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};
pub use slot::Slot;

/// Persistence keys, one per independently owned piece of state.
pub mod keys {
    pub const TASKS: &str = "tasks";
    pub const JOURNEYS: &str = "journeys";
    pub const NOTES: &str = "notes";
    pub const SETTINGS: &str = "settings";
    pub const ACTIVE_JOURNEY: &str = "active_journey";

    /// Every key owned by the core, used by full resets.
    pub const ALL: &[&str] = &[TASKS, JOURNEYS, NOTES, SETTINGS, ACTIVE_JOURNEY];
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Serialize(serde_json::Error),
    /// The medium refused the operation (e.g. simulated full disk).
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to serialize slot value: {err}"),
            Self::Unavailable(reason) => write!(f, "store unavailable: {reason}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::Unavailable(_) => None,
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

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Removes every core-owned slot, returning the store to first-run state.
///
/// Failures on individual keys are logged and skipped.
pub fn reset_all(store: &dyn KeyValueStore) {
    for key in keys::ALL {
        if let Err(err) = store.remove_raw(key) {
            log::warn!("event=store_reset module=store status=error key={key} error={err}");
        }
    }
    log::info!("event=store_reset module=store status=ok keys={}", keys::ALL.len());
}
