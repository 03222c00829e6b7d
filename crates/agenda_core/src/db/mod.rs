//! SQLite file behind the desktop key-value backend.
//!
//! # Responsibility
//! - Open connections that back `SqliteKeyValueStore`.
//! - Migrate the schema that holds `KV_TABLE` (`kv_entries`).
//! - Let adapters verify a connection carries that schema.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Calendar blobs are never read or written before migrations succeed.

use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

/// Table holding key-value entries (the local-storage analog).
pub const KV_TABLE: &str = "kv_entries";

pub type DbResult<T> = Result<T, DbError>;

/// Failure to open, migrate or verify the calendar database.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// File was written by a newer build of the app.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// Connection was not opened through `open_db*`.
    MissingTable(&'static str),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::MissingTable(table) => {
                write!(f, "table `{table}` missing; open the database with db::open_db")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::MissingTable(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Checks that `table` exists on `conn`.
///
/// # Errors
/// - `MissingTable` when the connection skipped migrations.
pub fn require_table(conn: &Connection, table: &'static str) -> DbResult<()> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
        [table],
        |row| row.get(0),
    )?;
    if exists {
        Ok(())
    } else {
        Err(DbError::MissingTable(table))
    }
}
