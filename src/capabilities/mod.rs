//! Typed operations crossing the core/shell boundary.
//!
//! The core never performs I/O. [`crate::App::update`] returns [`Effect`]
//! values describing what the shell should do; operation results come back
//! as [`crate::Event`]s.

pub mod http;
pub mod kv;

use serde::{Deserialize, Serialize};

use http::HttpRequest;
use kv::KvOperation;

/// A downloadable artifact produced by the export flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportFile {
    pub name: String,
    pub contents: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Read or write the durable/session store.
    KeyValue(KvOperation),
    /// Fetch the remote feed.
    Http(HttpRequest),
    /// The view model changed; the shell should re-read it.
    Render,
    /// Hand the exported collection to the user as a file download.
    Export(ExportFile),
}

impl Effect {
    #[must_use]
    pub fn is_render(&self) -> bool {
        matches!(self, Self::Render)
    }

    #[must_use]
    pub fn as_key_value(&self) -> Option<&KvOperation> {
        match self {
            Self::KeyValue(op) => Some(op),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_http(&self) -> Option<&HttpRequest> {
        match self {
            Self::Http(request) => Some(request),
            _ => None,
        }
    }
}
