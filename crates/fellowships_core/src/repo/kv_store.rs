//! String-array key-value persistence contracts and implementations.
//!
//! # Responsibility
//! - Define the narrow store contract used to persist bookmark ids.
//! - Provide process-local and SQLite-backed implementations.
//!
//! # Invariants
//! - `set_string_array` replaces the full value for a key (last write wins).
//! - Reads of a never-written key return `Ok(None)`, not an error.
//! - SQLite values are JSON arrays of strings; anything else is rejected as
//!   `InvalidData` instead of being masked.

use crate::db::{open_db, open_db_in_memory, DbError};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence store failure.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Stored value cannot be decoded.
    InvalidData(String),
    /// Store cannot serve requests (e.g. poisoned connection lock).
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid stored value: {message}"),
            Self::Unavailable(message) => write!(f, "persistence store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) | Self::Unavailable(_) => None,
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

/// Minimal key-value store for string arrays.
pub trait PersistenceStore {
    fn get_string_array(&self, key: &str) -> StoreResult<Option<Vec<String>>>;
    fn set_string_array(&self, key: &str, values: &[String]) -> StoreResult<()>;
}

impl<S: PersistenceStore + ?Sized> PersistenceStore for &S {
    fn get_string_array(&self, key: &str) -> StoreResult<Option<Vec<String>>> {
        (**self).get_string_array(key)
    }

    fn set_string_array(&self, key: &str, values: &[String]) -> StoreResult<()> {
        (**self).set_string_array(key, values)
    }
}

impl<S: PersistenceStore + ?Sized> PersistenceStore for Arc<S> {
    fn get_string_array(&self, key: &str) -> StoreResult<Option<Vec<String>>> {
        (**self).get_string_array(key)
    }

    fn set_string_array(&self, key: &str, values: &[String]) -> StoreResult<()> {
        (**self).set_string_array(key, values)
    }
}

/// Process-local store. Contents are lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryPersistenceStore {
    values: Mutex<HashMap<String, Vec<String>>>,
}

impl MemoryPersistenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, HashMap<String, Vec<String>>>> {
        self.values
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl PersistenceStore for MemoryPersistenceStore {
    fn get_string_array(&self, key: &str) -> StoreResult<Option<Vec<String>>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_string_array(&self, key: &str, values: &[String]) -> StoreResult<()> {
        self.lock()?.insert(key.to_string(), values.to_vec());
        Ok(())
    }
}

/// SQLite-backed store over the `kv_string_arrays` table.
pub struct SqlitePersistenceStore {
    conn: Mutex<Connection>,
}

impl SqlitePersistenceStore {
    /// Wraps an already migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Opens (and migrates) a database file.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    /// Opens a migrated in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("sqlite connection lock poisoned".to_string()))
    }
}

impl PersistenceStore for SqlitePersistenceStore {
    fn get_string_array(&self, key: &str) -> StoreResult<Option<Vec<String>>> {
        let conn = self.lock()?;
        let raw: Option<String> = conn
            .query_row(
                "SELECT value FROM kv_string_arrays WHERE key = ?1;",
                [key],
                |row| row.get(0),
            )
            .optional()?;

        raw.map(|text| {
            serde_json::from_str::<Vec<String>>(&text).map_err(|err| {
                StoreError::InvalidData(format!(
                    "kv_string_arrays.value for key `{key}` is not a string array: {err}"
                ))
            })
        })
        .transpose()
    }

    fn set_string_array(&self, key: &str, values: &[String]) -> StoreResult<()> {
        let encoded = serde_json::to_string(values)
            .map_err(|err| StoreError::InvalidData(format!("cannot encode values: {err}")))?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO kv_string_arrays (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, encoded],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryPersistenceStore, PersistenceStore};

    #[test]
    fn memory_store_replaces_values_per_key() {
        let store = MemoryPersistenceStore::new();
        assert_eq!(store.get_string_array("k").unwrap(), None);

        store.set_string_array("k", &["a".to_string()]).unwrap();
        store.set_string_array("k", &["b".to_string()]).unwrap();
        assert_eq!(
            store.get_string_array("k").unwrap(),
            Some(vec!["b".to_string()])
        );
        assert_eq!(store.get_string_array("other").unwrap(), None);
    }
}
