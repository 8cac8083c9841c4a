//! Key-value storage collaborator.
//!
//! Mirrors the extension storage API the popup was written against: a flat
//! namespace of string keys holding JSON values, read and written whole.
//! [`SqliteKeyValueStore`] persists to the `kv_store` table;
//! [`MemoryKeyValueStore`] keeps everything in process and can simulate a
//! store that is not ready yet.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};
use serde_json::Value;

use crate::database::Database;
use crate::types::bookmark::unix_now;
use crate::types::errors::StorageError;

/// Asynchronous key-value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value under `key`, or `None` when the key was never set.
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;
    /// Overwrites the value under `key`.
    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError>;
}

/// Key-value store backed by the SQLite `kv_store` table.
pub struct SqliteKeyValueStore {
    db: Mutex<Database>,
}

impl SqliteKeyValueStore {
    pub fn new(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    /// Opens (or creates) the database file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let db = Database::open(path).map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(Self::new(db))
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let db =
            Database::open_in_memory().map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(Self::new(db))
    }

    fn read(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let db = self
            .db
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        let raw: Option<String> = db
            .connection()
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;

        raw.map(|text| {
            serde_json::from_str(&text).map_err(|e| {
                StorageError::SerializationError(format!("Corrupt value for '{}': {}", key, e))
            })
        })
        .transpose()
    }

    fn write(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        let text = serde_json::to_string(value)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        let db = self
            .db
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        db.connection()
            .execute(
                "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3) \
                 ON CONFLICT(key) DO UPDATE \
                 SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, text, unix_now()],
            )
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for SqliteKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        self.read(key)
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        self.write(key, &value)
    }
}

/// In-process key-value store.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, Value>>,
    unready_reads: AtomicU32,
    writes_failing: AtomicBool,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose first `reads` calls to `get` fail with `Unavailable`,
    /// like extension storage queried before it has finished starting.
    pub fn not_ready_for(reads: u32) -> Self {
        let store = Self::default();
        store.unready_reads.store(reads, Ordering::SeqCst);
        store
    }

    /// Makes every subsequent `set` fail with `Unavailable` until reset.
    pub fn set_writes_failing(&self, failing: bool) {
        self.writes_failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let still_starting = self
            .unready_reads
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if still_starting {
            return Err(StorageError::Unavailable("store not ready".to_string()));
        }
        let entries = self
            .entries
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        if self.writes_failing.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("write rejected".to_string()));
        }
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        entries.insert(key.to_string(), value);
        Ok(())
    }
}
