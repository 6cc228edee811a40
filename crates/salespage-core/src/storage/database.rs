//! SQLite-backed key-value storage.
//!
//! Holds the persisted content document and the locker progress keys in a
//! single `kv` table. The schema is versioned by [`super::migrations`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection};

use super::{data_dir, KeyValueStore};
use crate::error::StorageError;

/// SQLite database holding the key-value table.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/salespage/<file_name>`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created or the
    /// database cannot be opened or migrated.
    pub fn open(file_name: &str) -> Result<Self, StorageError> {
        let dir = data_dir().map_err(|e| StorageError::QueryFailed(e.to_string()))?;
        Self::open_at(&dir.join(file_name))
    }

    /// Open (or create) the database at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Migration version the file is at.
    pub fn schema_version(&self) -> i32 {
        super::migrations::get_schema_version(&self.conn)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        super::migrations::migrate(&self.conn)
            .map_err(|e| StorageError::MigrationFailed(e.to_string()))
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Delete a key from the kv store. Missing keys are ignored.
    pub fn kv_delete(&self, key: &str) -> Result<(), rusqlite::Error> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// When `key` was last written, as stored (RFC 3339).
    pub fn kv_updated_at(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let result = self.conn.query_row(
            "SELECT updated_at FROM kv WHERE key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );
        match result {
            Ok(v) if v.is_empty() => Ok(None),
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.kv_get(key)?)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Ok(self.kv_set(key, value)?)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        Ok(self.kv_delete(key)?)
    }
}
