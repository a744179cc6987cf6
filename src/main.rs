//! Command-line entry point for the merge pipeline.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "litmerge", version, about = "Merge and deduplicate bibliographic CSV exports")]
struct Cli {
    /// Working directory containing the export files and outputs.
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Discover export files, merge, deduplicate, and render charts.
    Process,
    /// Delete all generated CSV and chart outputs.
    Clean,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Process => {
            let summary = litmerge::pipeline::process(&cli.dir)
                .with_context(|| format!("processing failed in {}", cli.dir.display()))?;

            for (label, count) in &summary.per_source {
                info!(source = label.as_str(), records = *count, "source loaded");
            }
            info!(
                merged = summary.merged,
                deduped = summary.deduped,
                duplicates = summary.duplicates,
                dropped_missing_title = summary.dropped_missing_title,
                "done"
            );
        }
        Command::Clean => {
            let removed = litmerge::pipeline::clean(&cli.dir)
                .with_context(|| format!("clean failed in {}", cli.dir.display()))?;
            info!(removed, "removed generated outputs");
        }
    }

    Ok(())
}
