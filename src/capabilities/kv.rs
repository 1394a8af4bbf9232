//! Key-value store operations.
//!
//! Two namespaces back the core: `Durable` survives across sessions (the
//! quote collection and the persisted category filter), `Session` is
//! cleared when the session ends (the last-viewed index).

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_KEY_LENGTH: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoreNamespace {
    Durable,
    Session,
}

impl StoreNamespace {
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Durable => "durable",
            Self::Session => "session",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreKey {
    namespace: StoreNamespace,
    key: String,
}

impl StoreKey {
    pub fn new(namespace: StoreNamespace, key: impl Into<String>) -> Result<Self, KvError> {
        let key = key.into();
        Self::validate(&key)?;
        Ok(Self { namespace, key })
    }

    /// Key of the persisted quote collection.
    #[must_use]
    pub fn quotes() -> Self {
        Self {
            namespace: StoreNamespace::Durable,
            key: crate::KEY_QUOTES.to_string(),
        }
    }

    /// Key of the persisted category filter.
    #[must_use]
    pub fn selected_category() -> Self {
        Self {
            namespace: StoreNamespace::Durable,
            key: crate::KEY_SELECTED_CATEGORY.to_string(),
        }
    }

    /// Session-scoped key of the last-viewed quote index.
    #[must_use]
    pub fn last_viewed_index() -> Self {
        Self {
            namespace: StoreNamespace::Session,
            key: crate::KEY_LAST_VIEWED_INDEX.to_string(),
        }
    }

    #[must_use]
    pub fn namespace(&self) -> StoreNamespace {
        self.namespace
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    fn validate(key: &str) -> Result<(), KvError> {
        if key.trim().is_empty() {
            return Err(KvError::InvalidKey {
                key: key.to_string(),
                reason: "key cannot be empty".to_string(),
            });
        }
        if key.len() > MAX_KEY_LENGTH {
            return Err(KvError::InvalidKey {
                key: key.chars().take(32).collect(),
                reason: format!("key exceeds maximum length of {MAX_KEY_LENGTH} bytes"),
            });
        }
        if key.chars().any(char::is_control) {
            return Err(KvError::InvalidKey {
                key: key.to_string(),
                reason: "key contains control characters".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KvOperation {
    Get { key: StoreKey },
    Set { key: StoreKey, value: Vec<u8> },
}

impl KvOperation {
    #[must_use]
    pub fn get(key: StoreKey) -> Self {
        Self::Get { key }
    }

    #[must_use]
    pub fn set(key: StoreKey, value: Vec<u8>) -> Self {
        Self::Set { key, value }
    }

    #[must_use]
    pub fn key(&self) -> &StoreKey {
        match self {
            Self::Get { key } | Self::Set { key, .. } => key,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum KvError {
    #[error("invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("storage read failed: {message}")]
    ReadFailed { message: String },

    #[error("storage write failed: {message}")]
    WriteFailed { message: String },
}

pub type KvResult = Result<Option<Vec<u8>>, KvError>;
