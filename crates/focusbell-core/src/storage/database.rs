//! SQLite-backed key-value storage.
//!
//! One small database holds the persisted session state and the daily
//! statistics record, each under a fixed key.

use rusqlite::{params, Connection};

use crate::error::StorageError;
use crate::stats::StatsStore;

use super::data_dir;

/// Fixed key for the daily statistics record.
pub const DAILY_STATS_KEY: &str = "daily_stats";

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/focusbell/focusbell.db`.
    ///
    /// Creates the file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        let path = data_dir()?.join("focusbell.db");
        let conn = Connection::open(&path)
            .map_err(|source| StorageError::OpenFailed { path, source })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

impl StatsStore for Database {
    fn load(&self) -> Result<Option<String>, StorageError> {
        self.kv_get(DAILY_STATS_KEY)
    }

    fn save(&self, json: &str) -> Result<(), StorageError> {
        self.kv_set(DAILY_STATS_KEY, json)
    }
}
