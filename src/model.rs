use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ValidationError;

/// The sole domain entity. Field order is significant for the export
/// encoding: text first, then category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub category: String,
}

impl Quote {
    /// Builds a quote from raw form input. Both fields are trimmed and must
    /// be non-empty afterwards.
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Result<Self, ValidationError> {
        let text = text.into().trim().to_string();
        let category = category.into().trim().to_string();
        if text.is_empty() {
            return Err(ValidationError::EmptyText);
        }
        if category.is_empty() {
            return Err(ValidationError::EmptyCategory);
        }
        Ok(Self { text, category })
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" ({})", self.text, self.category)
    }
}

/// Seed set used when the store is empty or its contents cannot be decoded.
#[must_use]
pub fn seed_quotes() -> Vec<Quote> {
    [
        (
            "The best way to get started is to quit talking and begin doing.",
            "Motivation",
        ),
        (
            "Don't let yesterday take up too much of today.",
            "Motivation",
        ),
        (
            "Life is what happens when you're busy making other plans.",
            "Life",
        ),
    ]
    .into_iter()
    .map(|(text, category)| Quote {
        text: text.to_string(),
        category: category.to_string(),
    })
    .collect()
}

/// The persisted filter choice: the `"all"` sentinel or an exact category.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    pub const ALL_SENTINEL: &'static str = "all";

    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw == Self::ALL_SENTINEL {
            Self::All
        } else {
            Self::Category(raw.to_string())
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => Self::ALL_SENTINEL,
            Self::Category(c) => c.as_str(),
        }
    }

    #[must_use]
    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            Self::All => true,
            Self::Category(c) => &quote.category == c,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the presentation adapter should currently show.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Display {
    /// Nothing to show: the filtered view is empty.
    #[default]
    Empty,
    /// A single randomly selected quote.
    Quote(Quote),
    /// The current filtered view as a list.
    List(Vec<Quote>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub message: String,
    pub duration_ms: u64,
}

/// In-memory session state. The quote list is the source of truth during a
/// session; the durable store is rewritten in full after every mutation.
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub quotes: Vec<Quote>,
    pub selected_category: CategoryFilter,
    /// Index into the last filtered view shown. Session-scoped; invalid once
    /// the collection shrinks below it.
    pub last_viewed_index: Option<usize>,
    pub display: Display,
    pub alert: Option<String>,
    pub toast: Option<Toast>,
    /// Tells the adapter to clear the new-quote form after a successful add.
    pub clear_inputs: bool,
    /// Single-slot guard: a sync tick is skipped while a previous
    /// fetch-and-merge is still in flight.
    pub sync_in_flight: bool,
    pub loaded: bool,
}

impl Model {
    /// Installs the persisted collection, falling back to the seed set when
    /// the store is empty or holds something undecodable. Returns whether
    /// the fallback was taken. Loading is not a mutation; nothing is
    /// flushed back.
    pub fn load_quotes(&mut self, persisted: Option<&[u8]>) -> bool {
        let decoded = persisted.and_then(|bytes| serde_json::from_slice::<Vec<Quote>>(bytes).ok());
        let seeded = decoded.is_none();
        self.quotes = decoded.unwrap_or_else(seed_quotes);
        self.loaded = true;
        seeded
    }

    /// Appends a user-entered quote. No deduplication; local duplicates are
    /// permitted.
    pub fn add_quote(
        &mut self,
        text: impl Into<String>,
        category: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let quote = Quote::new(text, category)?;
        self.quotes.push(quote);
        Ok(())
    }

    /// Deduplicating append used by remote reconciliation: a candidate is
    /// taken only if no existing quote has identical text (case-sensitive).
    /// Returns whether anything was appended.
    pub fn merge_quotes(&mut self, candidates: Vec<Quote>) -> bool {
        let mut known: std::collections::HashSet<String> =
            self.quotes.iter().map(|q| q.text.clone()).collect();
        let mut changed = false;
        for candidate in candidates {
            if known.insert(candidate.text.clone()) {
                self.quotes.push(candidate);
                changed = true;
            }
        }
        changed
    }

    /// Additive import: appends everything, including duplicates of existing
    /// entries. Unlike [`Model::merge_quotes`] this does not deduplicate;
    /// that asymmetry matches the import contract and is pinned by tests.
    pub fn append_all(&mut self, new_quotes: Vec<Quote>) {
        self.quotes.extend(new_quotes);
    }

    /// The current filtered view, in collection order.
    #[must_use]
    pub fn filtered(&self) -> Vec<&Quote> {
        crate::selector::filter_by_category(&self.quotes, &self.selected_category)
    }
}
