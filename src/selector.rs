//! Filtering and random selection over the quote collection.
//!
//! These are pure functions: the collection is passed in explicitly and the
//! category index is recomputed on demand rather than maintained
//! incrementally.

use rand::Rng;

use crate::model::{CategoryFilter, Quote};
use crate::EmptySelection;

/// Distinct categories in first-seen order. Deterministic for a fixed
/// collection state.
#[must_use]
pub fn categories(quotes: &[Quote]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for quote in quotes {
        if seen.insert(quote.category.as_str()) {
            out.push(quote.category.clone());
        }
    }
    out
}

/// The subsequence matching `filter`, or the whole collection for
/// [`CategoryFilter::All`]. An empty result is a valid outcome, never an
/// error; callers render the explicit empty state.
#[must_use]
pub fn filter_by_category<'a>(quotes: &'a [Quote], filter: &CategoryFilter) -> Vec<&'a Quote> {
    quotes.iter().filter(|q| filter.matches(q)).collect()
}

/// Picks one element uniformly at random. The returned index is relative to
/// `view` and is what gets recorded as the session's last-viewed index.
pub fn pick_random<'a, R: Rng + ?Sized>(
    rng: &mut R,
    view: &[&'a Quote],
) -> Result<(usize, &'a Quote), EmptySelection> {
    if view.is_empty() {
        return Err(EmptySelection);
    }
    let index = rng.gen_range(0..view.len());
    Ok((index, view[index]))
}
