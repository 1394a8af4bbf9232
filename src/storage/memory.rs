use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::capabilities::kv::KvError;
use crate::runtime::KeyValueStore;

/// In-memory store. Session-scoped by construction: dropping it drops the
/// data, which is exactly the lifetime the session namespace wants.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Test convenience: a store pre-populated with the given entries.
    #[must_use]
    pub fn with_entries(entries: impl IntoIterator<Item = (String, Vec<u8>)>) -> Self {
        Self {
            entries: Mutex::new(entries.into_iter().collect()),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>>, KvError> {
        self.entries.lock().map_err(|_| KvError::ReadFailed {
            message: "store mutex poisoned".to_string(),
        })
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), KvError> {
        self.lock()?.insert(key.to_string(), value);
        Ok(())
    }
}
