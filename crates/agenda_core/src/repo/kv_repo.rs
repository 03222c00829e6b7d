//! Key-value storage contracts and implementations.
//!
//! # Responsibility
//! - Mirror the browser local-storage surface (`get`/`set`/`remove`).
//! - Provide an in-memory backend and a SQLite backend.
//!
//! # Invariants
//! - `set` overwrites the whole value for a key.
//! - SQLite backend requires the `kv_entries` table from migrations.

use crate::db::{require_table, KV_TABLE};
use crate::repo::RepoResult;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;

/// String key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> RepoResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> RepoResult<()>;
    /// Returns whether a value existed.
    fn remove(&mut self, key: &str) -> RepoResult<bool>;
}

/// Process-local storage for tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: HashMap<String, String>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> RepoResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> RepoResult<bool> {
        Ok(self.entries.remove(key).is_some())
    }
}

/// SQLite-backed key-value storage over `kv_entries`.
pub struct SqliteKeyValueStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueStore<'conn> {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - `Db(MissingTable)` when `kv_entries` is missing (connection was
    ///   not opened through `db::open_db*`).
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        require_table(conn, KV_TABLE)?;
        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteKeyValueStore<'_> {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(changed > 0)
    }
}
