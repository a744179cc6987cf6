//! Merge, deduplicate, and chart bibliographic CSV exports.
//!
//! `litmerge` combines publication lists exported from multiple citation
//! databases (Scopus, IEEE Xplore) into a single deduplicated dataset plus a
//! duplicates report, and renders summary bar charts before and after the
//! merge. It is aimed at literature surveys where the same paper shows up in
//! several database exports and has to be counted exactly once.
//!
//! # Pipeline
//!
//! The pipeline is a strictly linear batch transform:
//!
//! 1. Discover CSV files per source type by glob pattern ([`ingest`]).
//! 2. Normalize each file to the canonical column set
//!    `{Title, Authors, Year, Source}` using a static per-source header
//!    mapping; rows without a Title are dropped and counted.
//! 3. Render per-source "by year" and "by source" bar charts (feature
//!    `charts`).
//! 4. Concatenate all sources in order and split on exact (normalized)
//!    Title match into a deduplicated table and a duplicates table
//!    ([`merge`]).
//! 5. Write `post_processed.csv` and `duplicates.csv`, overwriting previous
//!    runs ([`export`]), and render the post-merge charts.
//!
//! # Feature flags
//!
//! - `charts` - PNG bar-chart rendering via `plotters` (enabled by default)
//!
//! # Basic usage
//!
//! ```rust
//! use litmerge::{Record, merge::merge_and_dedupe};
//!
//! let records = vec![
//!     Record::new("Paper X", Some(2020), "Scopus"),
//!     Record::new("Paper Y", Some(2021), "Scopus"),
//!     Record::new("Paper X", Some(2020), "IEEE Xplore"),
//! ];
//!
//! let outcome = merge_and_dedupe(records);
//! assert_eq!(outcome.deduped.len(), 2);
//! assert_eq!(outcome.duplicates.len(), 1);
//! assert_eq!(outcome.duplicates[0].source, "IEEE Xplore");
//! ```
//!
//! # Deduplication policy
//!
//! Matching is by Title only, after trimming, lowercasing, and collapsing
//! internal whitespace (see [`merge::title_key`]). The first occurrence of a
//! title wins; input order is source declaration order, then sorted file
//! path order within a source, then row order within a file. Re-running the
//! pipeline on identical inputs produces byte-identical outputs.

use serde::{Deserialize, Serialize};

#[cfg(feature = "charts")]
pub mod chart;
pub mod error;
pub mod export;
pub mod ingest;
pub mod merge;
pub mod pipeline;

// Reexports
pub use error::{ParseError, PipelineError};
pub use ingest::SourceConfig;
pub use merge::MergeOutcome;
pub use pipeline::ProcessSummary;

/// A publication entry reduced to the canonical column set.
///
/// Every record carries a non-empty `title` (the deduplication key is
/// derived from it) and the label of the source database it came from.
/// Field order matches the CSV output columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Record {
    /// Title of the work. Never empty; rows without a title are dropped
    /// during ingestion.
    pub title: String,
    /// Author list as a single cell, exactly as exported by the source.
    pub authors: Option<String>,
    /// Publication year, when the export carried a parseable value.
    pub year: Option<i32>,
    /// Label of the originating database (e.g. "Scopus").
    pub source: String,
}

impl Record {
    /// Create a record without author information.
    pub fn new(title: impl Into<String>, year: Option<i32>, source: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            authors: None,
            year,
            source: source.into(),
        }
    }

    /// Create a record with an author cell.
    pub fn with_authors(
        title: impl Into<String>,
        authors: impl Into<String>,
        year: Option<i32>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            authors: Some(authors.into()),
            year,
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_record_csv_round_trip() {
        let record = Record::with_authors("Test Paper", "Smith, J.", Some(2023), "Scopus");

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(&record).unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(
            text,
            "Title,Authors,Year,Source\nTest Paper,\"Smith, J.\",2023,Scopus\n"
        );

        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let back: Record = reader.deserialize().next().unwrap().unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_record_empty_optionals_serialize_as_empty_cells() {
        let record = Record::new("Untitled Fields", None, "IEEE Xplore");

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(&record).unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(
            text,
            "Title,Authors,Year,Source\nUntitled Fields,,,IEEE Xplore\n"
        );
    }
}
