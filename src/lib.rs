#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod app;
pub mod capabilities;
pub mod event;
pub mod model;
pub mod runtime;
pub mod selector;
pub mod storage;
pub mod sync;
pub mod transfer;

use std::time::Duration;
use thiserror::Error;

pub use app::{App, Display, Toast, ViewModel};
pub use capabilities::http::{HttpError, HttpRequest, HttpResponse, ValidatedUrl};
pub use capabilities::kv::{KvError, KvOperation, StoreKey, StoreNamespace};
pub use capabilities::{Effect, ExportFile};
pub use event::Event;
pub use model::{CategoryFilter, Model, Quote};

/// Durable store key holding the serialized quote collection.
pub const KEY_QUOTES: &str = "quotes";
/// Durable store key holding the persisted category filter.
pub const KEY_SELECTED_CATEGORY: &str = "selectedCategory";
/// Session store key holding the index of the last quote shown.
pub const KEY_LAST_VIEWED_INDEX: &str = "lastViewedQuoteIndex";

/// Conventional name for the exported collection artifact.
pub const EXPORT_FILE_NAME: &str = "quotes.json";

/// At most this many remote records are mapped into quotes per fetch.
pub const REMOTE_QUOTE_CAP: usize = 5;
/// Category assigned to every quote mapped from the remote feed.
pub const SERVER_CATEGORY: &str = "Server";
pub const DEFAULT_REMOTE_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/posts";

pub const SYNC_INTERVAL: Duration = Duration::from_secs(60);
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);
pub const TOAST_DURATION_MS: u64 = 5_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("quote text cannot be empty")]
    EmptyText,
    #[error("quote category cannot be empty")]
    EmptyCategory,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("import payload is not valid JSON: {0}")]
    Malformed(String),
    #[error("expected a JSON array of quotes, found {found}")]
    NotAnArray { found: &'static str },
    #[error("entry {index} is not a quote-shaped object")]
    NotAnObject { index: usize },
    #[error("entry {index} has no usable text field")]
    MissingText { index: usize },
}

/// Selection was attempted on an empty filtered view. Rendered as the
/// explicit empty state, never shown to the user as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot select from an empty quote view")]
pub struct EmptySelection;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuoteError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Storage(#[from] KvError),
    #[error(transparent)]
    Network(#[from] HttpError),
    #[error(transparent)]
    EmptySelection(#[from] EmptySelection),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl QuoteError {
    /// Alert-style text for the presentation adapter. Network and selection
    /// failures deliberately have no alert path; their strings exist only
    /// for logging.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(_) => {
                "Please fill in both the quote and category fields.".into()
            }
            Self::Format(e) => format!("Error importing quotes: {e}"),
            Self::Storage(_) => "Unable to save your quotes locally.".into(),
            Self::Network(_) => "Unable to reach the quote server.".into(),
            Self::EmptySelection(_) => "No quotes available. Add some!".into(),
            Self::Config(reason) => format!("Invalid configuration: {reason}"),
        }
    }
}

/// Static configuration for the core. Constructed once at startup and handed
/// to [`App::new`].
#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: ValidatedUrl,
    pub sync_interval: Duration,
    pub remote_cap: usize,
    pub server_category: String,
}

impl Config {
    pub fn new(endpoint: &str) -> Result<Self, QuoteError> {
        let endpoint = ValidatedUrl::new(endpoint)
            .map_err(|e| QuoteError::Config(e.to_string()))?;
        Ok(Self {
            endpoint,
            sync_interval: SYNC_INTERVAL,
            remote_cap: REMOTE_QUOTE_CAP,
            server_category: SERVER_CATEGORY.to_string(),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_REMOTE_ENDPOINT).expect("default endpoint is a valid URL")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.remote_cap, REMOTE_QUOTE_CAP);
        assert_eq!(config.server_category, SERVER_CATEGORY);
        assert_eq!(config.sync_interval, SYNC_INTERVAL);
    }

    #[test]
    fn config_rejects_bad_endpoint() {
        assert!(Config::new("not a url").is_err());
        assert!(Config::new("ftp://example.com/feed").is_err());
    }

    #[test]
    fn validation_error_maps_to_form_alert() {
        let err = QuoteError::from(ValidationError::EmptyText);
        assert_eq!(
            err.user_message(),
            "Please fill in both the quote and category fields."
        );
    }

    #[test]
    fn format_error_alert_carries_detail() {
        let err = QuoteError::from(FormatError::NotAnArray { found: "object" });
        assert!(err.user_message().starts_with("Error importing quotes:"));
    }
}
