//! Mapping the remote feed into quote candidates.
//!
//! The remote endpoint is a simulation boundary: its schema is arbitrary and
//! only the `title` field is meaningful here. The mapping policy is fixed:
//! the first few titles become quotes in the reserved server category.

use serde::Deserialize;

use crate::capabilities::http::{HttpError, HttpResponse};
use crate::model::Quote;

/// One record of the remote feed. Unknown fields are ignored; a record
/// without a title maps to an empty string and is skipped.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteEntry {
    #[serde(default)]
    pub title: String,
}

/// Maps at most `cap` remote entries into quotes with the fixed `category`.
/// Entries whose title trims to empty are dropped rather than producing
/// unusable quotes.
#[must_use]
pub fn map_remote(entries: Vec<RemoteEntry>, cap: usize, category: &str) -> Vec<Quote> {
    entries
        .into_iter()
        .take(cap)
        .filter_map(|entry| {
            let text = entry.title.trim().to_string();
            if text.is_empty() {
                None
            } else {
                Some(Quote {
                    text,
                    category: category.to_string(),
                })
            }
        })
        .collect()
}

/// Turns a fetch response into merge candidates. Non-success statuses and
/// undecodable bodies are network-level failures; the caller logs and
/// swallows them.
pub fn quotes_from_response(
    response: &HttpResponse,
    cap: usize,
    category: &str,
) -> Result<Vec<Quote>, HttpError> {
    if !response.is_success() {
        return Err(HttpError::Status {
            status: response.status(),
        });
    }
    let entries: Vec<RemoteEntry> = response.json()?;
    Ok(map_remote(entries, cap, category))
}
