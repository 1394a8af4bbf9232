use serde::{Deserialize, Serialize};

use crate::capabilities::http::HttpResult;
use crate::capabilities::kv::{KvError, KvResult};

/// Everything that can happen to the core: user intents arriving from the
/// presentation adapter, scheduler ticks, and capability results coming back
/// from the shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // Lifecycle
    Start,
    QuotesLoaded(KvResult),
    SelectedCategoryLoaded(KvResult),
    LastViewedLoaded(KvResult),
    StoreWritten(Result<(), KvError>),

    // User actions; payloads are what the adapter read from its inputs
    NewQuoteSubmitted { text: String, category: String },
    ShowRandomRequested,
    CategorySelected { raw: String },
    ExportRequested,
    ImportFileLoaded { payload: Vec<u8> },

    // Sync agent
    SyncTick,
    RemoteFetched(Box<HttpResult>),
}
