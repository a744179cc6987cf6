//! Concatenation and title-based deduplication.
//!
//! The merged table is scanned once in input order while maintaining a set
//! of already-seen title keys. The first record carrying a given key goes to
//! the deduplicated table; every later record with the same key goes to the
//! duplicates table. The two tables partition the input exactly.

use std::collections::HashSet;

use tracing::info;

use crate::Record;

/// The result of merging and deduplicating all loaded sources.
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    /// Exactly one record per distinct title key, first occurrence kept.
    pub deduped: Vec<Record>,
    /// Every record whose title key matched an earlier-kept record.
    pub duplicates: Vec<Record>,
}

impl MergeOutcome {
    /// Total number of records before deduplication.
    pub fn merged_len(&self) -> usize {
        self.deduped.len() + self.duplicates.len()
    }
}

/// The normalized comparison key for a title.
///
/// Exact string matching is brittle against formatting variance between
/// databases, so the key is trimmed, lowercased, and has internal whitespace
/// runs collapsed to single spaces. Punctuation is kept: stripping it would
/// conflate genuinely distinct titles.
pub fn title_key(title: &str) -> String {
    title
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Concatenate records in input order and split them into a deduplicated
/// table and a duplicates table, first occurrence winning.
///
/// Which record of a duplicate pair is retained depends on input order;
/// total counts do not.
pub fn merge_and_dedupe<I>(records: I) -> MergeOutcome
where
    I: IntoIterator<Item = Record>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut outcome = MergeOutcome::default();

    for record in records {
        if seen.insert(title_key(&record.title)) {
            outcome.deduped.push(record);
        } else {
            outcome.duplicates.push(record);
        }
    }

    info!(
        merged = outcome.merged_len(),
        deduped = outcome.deduped.len(),
        duplicates = outcome.duplicates.len(),
        "deduplicated merged table"
    );
    outcome
}
