//! Persistence boundary for the event store.
//!
//! # Responsibility
//! - Abstract browser-style local storage behind `KeyValueStore`.
//! - Encode/decode the full event sequence as one JSON blob.
//!
//! # Invariants
//! - The store never sees storage details; it only calls `EventPersistence`.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod event_repo;
pub mod kv_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence failure for key-value and event blob operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Persisted blob is not valid JSON for the event sequence.
    Decode(serde_json::Error),
    Encode(serde_json::Error),
    /// Blob decoded but violates a store invariant.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Decode(err) => write!(f, "failed to decode persisted events: {err}"),
            Self::Encode(err) => write!(f, "failed to encode events: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted event data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Decode(err) | Self::Encode(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
