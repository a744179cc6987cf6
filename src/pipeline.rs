//! End-to-end orchestration of the merge pipeline.
//!
//! [`process`] runs the whole linear transform for a working directory:
//! load each source family, render the pre-merge charts, merge and
//! deduplicate, write the CSV outputs, render the post-merge charts, and
//! return a summary of what happened. [`clean`] deletes everything a
//! previous run generated.
//!
//! Output files are written only after every source has loaded successfully,
//! so a fatal ingestion error never leaves partial CSVs from the current
//! run behind.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::PipelineError;
use crate::export::{self, DUPLICATES_FILE, POST_PROCESSED_FILE};
use crate::ingest::{self, LoadedSource, SourceConfig, builtin_sources};
use crate::merge::merge_and_dedupe;

/// Post-merge chart of publications per year.
pub const BY_YEAR_CHART: &str = "publications_by_year.png";
/// Post-merge chart of publications per source.
pub const BY_SOURCE_CHART: &str = "publications_by_source.png";
/// Post-merge chart of duplicate rows per source.
pub const DUPLICATES_CHART: &str = "duplicates_count.png";

/// Counts reported after a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSummary {
    /// (source label, record count) per source family, in merge order.
    pub per_source: Vec<(String, usize)>,
    /// Records in the merged table before deduplication.
    pub merged: usize,
    /// Records in the deduplicated table.
    pub deduped: usize,
    /// Records in the duplicates table.
    pub duplicates: usize,
    /// Rows dropped during ingestion for lacking a title.
    pub dropped_missing_title: usize,
}

/// Run the pipeline for `dir` with the built-in source families.
pub fn process(dir: &Path) -> Result<ProcessSummary, PipelineError> {
    process_with_sources(dir, &builtin_sources())
}

/// Run the pipeline for `dir` with an explicit list of source families.
///
/// Source order is the merge order and therefore the deduplication
/// tie-break order.
pub fn process_with_sources(
    dir: &Path,
    sources: &[SourceConfig],
) -> Result<ProcessSummary, PipelineError> {
    let mut loaded: Vec<LoadedSource> = Vec::with_capacity(sources.len());
    for config in sources {
        loaded.push(ingest::load_source(dir, config)?);
    }

    #[cfg(feature = "charts")]
    for (config, source) in sources.iter().zip(&loaded) {
        if source.files_read == 0 {
            // Zero matched files: no pre-merge charts for this source.
            continue;
        }
        render_pre_merge_charts(dir, config, source)?;
    }

    let per_source: Vec<(String, usize)> = loaded
        .iter()
        .map(|s| (s.label.clone(), s.records.len()))
        .collect();
    let dropped_missing_title = loaded.iter().map(|s| s.dropped_missing_title).sum();

    let outcome = merge_and_dedupe(loaded.into_iter().flat_map(|s| s.records));

    let (post_processed_path, duplicates_path) = export::output_paths(dir);
    export::write_records(&post_processed_path, &outcome.deduped)?;
    export::write_records(&duplicates_path, &outcome.duplicates)?;

    #[cfg(feature = "charts")]
    render_post_merge_charts(dir, &outcome)?;

    let summary = ProcessSummary {
        per_source,
        merged: outcome.merged_len(),
        deduped: outcome.deduped.len(),
        duplicates: outcome.duplicates.len(),
        dropped_missing_title,
    };
    info!(
        merged = summary.merged,
        deduped = summary.deduped,
        duplicates = summary.duplicates,
        dropped = summary.dropped_missing_title,
        "pipeline run complete"
    );
    Ok(summary)
}

#[cfg(feature = "charts")]
fn render_pre_merge_charts(
    dir: &Path,
    config: &SourceConfig,
    source: &LoadedSource,
) -> Result<(), PipelineError> {
    use crate::chart::{count_by_source, count_by_year, render_bar_chart};

    let slug = config.slug();
    render_bar_chart(
        &dir.join(format!("{slug}_publications_by_year.png")),
        &format!("Publications by Year - {}", source.label),
        "Publication Year",
        "Number of Publications",
        &count_by_year(&source.records),
    )?;
    render_bar_chart(
        &dir.join(format!("{slug}_publications_by_source.png")),
        &format!("Publications by Source - {}", source.label),
        "Source",
        "Number of Publications",
        &count_by_source(&source.records),
    )
}

#[cfg(feature = "charts")]
fn render_post_merge_charts(
    dir: &Path,
    outcome: &crate::merge::MergeOutcome,
) -> Result<(), PipelineError> {
    use crate::chart::{count_by_source, count_by_year, render_bar_chart};

    render_bar_chart(
        &dir.join(BY_YEAR_CHART),
        "Publications by Year",
        "Publication Year",
        "Number of Publications",
        &count_by_year(&outcome.deduped),
    )?;
    render_bar_chart(
        &dir.join(BY_SOURCE_CHART),
        "Publications by Source",
        "Source",
        "Number of Publications",
        &count_by_source(&outcome.deduped),
    )?;
    render_bar_chart(
        &dir.join(DUPLICATES_CHART),
        "Duplicate Records by Source",
        "Source",
        "Number of Duplicates",
        &count_by_source(&outcome.duplicates),
    )
}

/// Delete every output a previous run may have generated for the built-in
/// sources. Returns the number of files removed.
pub fn clean(dir: &Path) -> Result<usize, PipelineError> {
    clean_with_sources(dir, &builtin_sources())
}

/// Delete generated outputs for an explicit source list.
pub fn clean_with_sources(dir: &Path, sources: &[SourceConfig]) -> Result<usize, PipelineError> {
    let mut targets: Vec<PathBuf> = vec![
        dir.join(POST_PROCESSED_FILE),
        dir.join(DUPLICATES_FILE),
        dir.join(BY_YEAR_CHART),
        dir.join(BY_SOURCE_CHART),
        dir.join(DUPLICATES_CHART),
    ];
    for config in sources {
        let slug = config.slug();
        targets.push(dir.join(format!("{slug}_publications_by_year.png")));
        targets.push(dir.join(format!("{slug}_publications_by_source.png")));
    }

    let mut removed = 0usize;
    for path in targets {
        if path.exists() {
            fs::remove_file(&path).map_err(|e| PipelineError::Write {
                path: path.clone(),
                source: e,
            })?;
            info!(path = %path.display(), "removed generated output");
            removed += 1;
        }
    }
    Ok(removed)
}
