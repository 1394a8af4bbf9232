//! SQLite-backed durable store.
//!
//! A single-table key-value layout keeps the schema trivial; the full quote
//! collection is one row. The connection sits behind a std `Mutex` and no
//! await point is crossed while the guard is held, so the async trait impls
//! stay well-behaved on a multithreaded runtime.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use crate::capabilities::kv::KvError;
use crate::runtime::KeyValueStore;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS kv (
    key   TEXT PRIMARY KEY,
    value BLOB NOT NULL
)";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, KvError> {
        let conn = Connection::open(path).map_err(open_error)?;
        Self::with_connection(conn)
    }

    /// Private in-memory database; used by tests.
    pub fn open_in_memory() -> Result<Self, KvError> {
        let conn = Connection::open_in_memory().map_err(open_error)?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, KvError> {
        conn.execute(SCHEMA, []).map_err(open_error)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, KvError> {
        self.conn.lock().map_err(|_| KvError::ReadFailed {
            message: "connection mutex poisoned".to_string(),
        })
    }
}

fn open_error(e: rusqlite::Error) -> KvError {
    KvError::ReadFailed {
        message: format!("could not open store: {e}"),
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError> {
        let conn = self.lock()?;
        conn.query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
            row.get::<_, Vec<u8>>(0)
        })
        .optional()
        .map_err(|e| KvError::ReadFailed {
            message: e.to_string(),
        })
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), KvError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )
        .map_err(|e| KvError::WriteFailed {
            message: e.to_string(),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_reads_as_none() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.get("quotes").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set("quotes", b"[]".to_vec()).await.unwrap();
        assert_eq!(store.get("quotes").await.unwrap(), Some(b"[]".to_vec()));
    }

    #[tokio::test]
    async fn upsert_overwrites_existing_value() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set("k", b"one".to_vec()).await.unwrap();
        store.set("k", b"two".to_vec()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(b"two".to_vec()));
    }

    #[tokio::test]
    async fn survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quotes.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.set("quotes", b"[1]".to_vec()).await.unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.get("quotes").await.unwrap(), Some(b"[1]".to_vec()));
    }
}
