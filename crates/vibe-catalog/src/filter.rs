#![forbid(unsafe_code)]

//! Category + substring search over prompt records.
//!
//! A record passes when its category is admitted by the [`CategoryFilter`]
//! and the query is empty or occurs, case-insensitively, in the title, the
//! description, or the category's display name. The result is a stable
//! subsequence of the input.
//!
//! Case folding is Unicode lowercase on both sides. The query is matched
//! verbatim, surrounding whitespace included.

use crate::category::CategoryFilter;
use crate::prompt::PromptRecord;

/// Whether `record` passes. `needle` must already be lowercase.
fn passes(record: &PromptRecord, category: CategoryFilter, needle: &str) -> bool {
    if !category.admits(record.category) {
        return false;
    }
    needle.is_empty()
        || record.title.to_lowercase().contains(needle)
        || record.description.to_lowercase().contains(needle)
        || record.category.display_name().to_lowercase().contains(needle)
}

/// Whether a single record passes the filter.
#[must_use]
pub fn matches(record: &PromptRecord, category: CategoryFilter, query: &str) -> bool {
    passes(record, category, &query.to_lowercase())
}

/// Records passing the filter, in input order.
#[must_use]
pub fn filter<'a>(
    records: &'a [PromptRecord],
    category: CategoryFilter,
    query: &str,
) -> Vec<&'a PromptRecord> {
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|r| passes(r, category, &needle))
        .collect()
}

fn filter_indices(records: &[PromptRecord], category: CategoryFilter, query: &str) -> Vec<usize> {
    let needle = query.to_lowercase();
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| passes(r, category, &needle))
        .map(|(i, _)| i)
        .collect()
}

/// Memo of the last filter result, keyed on `(category, query)`.
///
/// The record slice is assumed fixed for the cache's lifetime (the
/// repository is immutable), so the key omits it.
#[derive(Debug, Clone, Default)]
pub struct FilterCache {
    key: Option<(CategoryFilter, String)>,
    indices: Vec<usize>,
    recomputes: u64,
}

impl FilterCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Indices into `records` of the passing records, recomputed only when
    /// the key changed since the last call.
    pub fn get(&mut self, records: &[PromptRecord], category: CategoryFilter, query: &str) -> &[usize] {
        let fresh = self
            .key
            .as_ref()
            .is_some_and(|(c, q)| *c == category && q == query);
        if !fresh {
            self.indices = filter_indices(records, category, query);
            self.key = Some((category, query.to_string()));
            self.recomputes += 1;
            tracing::trace!(
                ?category,
                query,
                hits = self.indices.len(),
                "filter recomputed"
            );
        }
        &self.indices
    }

    /// Drop the memo so the next `get` recomputes.
    pub fn invalidate(&mut self) {
        self.key = None;
    }

    /// How many times the filter actually ran.
    #[must_use]
    pub const fn recomputes(&self) -> u64 {
        self.recomputes
    }
}
