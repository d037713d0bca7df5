//! Key-value persistence adapter contract.
//!
//! # Responsibility
//! - Describe the durable text storage the store depends on.
//! - Carry every write failure as a recoverable `PersistenceError`.
//!
//! # Invariants
//! - `load` never fails: missing or unreadable entries are `None`.
//! - `save_all` is the unit of persistence for one store mutation.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Durable save failed. The in-memory state that triggered it is kept.
#[derive(Debug)]
pub enum PersistenceError {
    /// Writing would exceed the storage quota.
    QuotaExceeded {
        key: String,
        needed: usize,
        quota: usize,
    },
    /// Backend cannot accept writes at all.
    Unavailable(String),
    /// Records could not be serialized.
    Encode(serde_json::Error),
    /// SQLite backend failure.
    Db(DbError),
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QuotaExceeded { key, needed, quota } => write!(
                f,
                "storage quota exceeded writing `{key}`: needs {needed} bytes, quota is {quota}"
            ),
            Self::Unavailable(reason) => write!(f, "storage unavailable: {reason}"),
            Self::Encode(err) => write!(f, "failed to encode records: {err}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::QuotaExceeded { .. } => None,
            Self::Unavailable(_) => None,
            Self::Encode(err) => Some(err),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

impl From<DbError> for PersistenceError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for PersistenceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable key-value text storage.
pub trait PersistenceAdapter {
    /// Stores `value` under `key`, replacing any previous value.
    fn save(&mut self, key: &str, value: &str) -> PersistenceResult<()>;

    /// Returns the value stored under `key`, if any.
    fn load(&self, key: &str) -> Option<String>;

    /// Stores several entries as one logical write.
    ///
    /// The default writes entries in order and stops at the first failure.
    /// Backends that can commit atomically should override it.
    fn save_all(&mut self, entries: &[(&str, String)]) -> PersistenceResult<()> {
        for (key, value) in entries {
            self.save(key, value)?;
        }
        Ok(())
    }
}

impl<A: PersistenceAdapter + ?Sized> PersistenceAdapter for &mut A {
    fn save(&mut self, key: &str, value: &str) -> PersistenceResult<()> {
        (**self).save(key, value)
    }

    fn load(&self, key: &str) -> Option<String> {
        (**self).load(key)
    }

    fn save_all(&mut self, entries: &[(&str, String)]) -> PersistenceResult<()> {
        (**self).save_all(entries)
    }
}
