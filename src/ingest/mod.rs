//! Discovery and normalization of bibliographic CSV exports.
//!
//! Each source database is described by a [`SourceConfig`] carrying a
//! filename glob pattern and a static column-name mapping. [`load_source`]
//! discovers the matching files in a directory (sorted, for deterministic
//! merge order), parses each one, and normalizes it to the canonical
//! `{Title, Authors, Year, Source}` record set.
//!
//! # Example
//!
//! ```no_run
//! use litmerge::ingest::{SourceConfig, load_source};
//! use std::path::Path;
//!
//! let loaded = load_source(Path::new("."), &SourceConfig::scopus()).unwrap();
//! println!("{} records from {} files", loaded.records.len(), loaded.files_read);
//! ```

mod config;
mod parse;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::Record;
use crate::error::PipelineError;

pub use config::{SourceConfig, builtin_sources};

/// All records loaded for one source type, across every matched file.
#[derive(Debug)]
pub struct LoadedSource {
    /// The source label (e.g. "Scopus").
    pub label: String,
    /// Normalized records in file order, then row order.
    pub records: Vec<Record>,
    /// Number of files that matched the source's glob pattern.
    pub files_read: usize,
    /// Total rows dropped across all files because the Title cell was empty.
    pub dropped_missing_title: usize,
}

/// Discover the files matching `pattern` under `dir`, sorted by path.
///
/// Sorting pins down the "first occurrence wins" tie-break for duplicate
/// titles that appear in more than one file of the same source.
pub fn discover_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, PipelineError> {
    let full_pattern = dir.join(pattern);
    let full_pattern = full_pattern.to_string_lossy();

    let entries = glob::glob(&full_pattern).map_err(|e| PipelineError::Pattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| {
            let path = e.path().to_path_buf();
            PipelineError::Read {
                path,
                source: e.into_error(),
            }
        })?;
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Load and normalize every export file of one source type.
///
/// A file that cannot be read or parsed fails the whole run; a partial
/// literature survey is worse than an obvious crash. Zero matching files is
/// not an error: the source simply contributes no rows.
pub fn load_source(dir: &Path, config: &SourceConfig) -> Result<LoadedSource, PipelineError> {
    let paths = discover_files(dir, config.pattern())?;

    if paths.is_empty() {
        warn!(
            source = config.label(),
            pattern = config.pattern(),
            "no export files found for source"
        );
    }

    let mut records = Vec::new();
    let mut dropped_missing_title = 0usize;
    let files_read = paths.len();

    for path in &paths {
        let text = fs::read_to_string(path).map_err(|e| PipelineError::Read {
            path: path.clone(),
            source: e,
        })?;

        let parsed = parse::parse_source_csv(&text, config, path)?;
        info!(
            source = config.label(),
            file = %path.display(),
            rows = parsed.records.len(),
            dropped = parsed.dropped_missing_title,
            "normalized export file"
        );
        if parsed.dropped_missing_title > 0 {
            warn!(
                file = %path.display(),
                dropped = parsed.dropped_missing_title,
                "dropped rows with empty titles"
            );
        }

        dropped_missing_title += parsed.dropped_missing_title;
        records.extend(parsed.records);
    }

    Ok(LoadedSource {
        label: config.label().to_string(),
        records,
        files_read,
        dropped_missing_title,
    })
}
