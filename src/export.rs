//! CSV export of the deduplicated and duplicates tables.
//!
//! Output file names are fixed and every run is a full overwrite, so a rerun
//! on identical inputs is idempotent. There is no merging with previous
//! runs.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::Record;
use crate::error::PipelineError;

/// File name of the deduplicated table.
pub const POST_PROCESSED_FILE: &str = "post_processed.csv";
/// File name of the duplicates table.
pub const DUPLICATES_FILE: &str = "duplicates.csv";

/// Write records to a CSV file with a header row, overwriting any existing
/// file at the same path.
///
/// The header row is written even for an empty table, so downstream tools
/// can always read the output.
pub fn write_records(path: &Path, records: &[Record]) -> Result<(), PipelineError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| export_error(path, e))?;

    writer
        .write_record(["Title", "Authors", "Year", "Source"])
        .map_err(|e| export_error(path, e))?;
    for record in records {
        writer.serialize(record).map_err(|e| export_error(path, e))?;
    }
    writer.flush().map_err(|e| PipelineError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;

    info!(path = %path.display(), rows = records.len(), "wrote CSV output");
    Ok(())
}

fn export_error(path: &Path, source: csv::Error) -> PipelineError {
    PipelineError::Export {
        path: path.to_path_buf(),
        source,
    }
}

/// Resolve the two output paths under a working directory.
pub fn output_paths(dir: &Path) -> (PathBuf, PathBuf) {
    (dir.join(POST_PROCESSED_FILE), dir.join(DUPLICATES_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn test_write_records_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(POST_PROCESSED_FILE);
        let records = vec![
            Record::with_authors("Paper X", "Smith J.", Some(2020), "Scopus"),
            Record::new("Paper Y", None, "IEEE Xplore"),
        ];

        write_records(&path, &records).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "Title,Authors,Year,Source\n\
             Paper X,Smith J.,2020,Scopus\n\
             Paper Y,,,IEEE Xplore\n"
        );
    }

    #[test]
    fn test_write_records_overwrites_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DUPLICATES_FILE);

        write_records(&path, &[Record::new("Old", Some(2019), "Scopus")]).unwrap();
        write_records(&path, &[Record::new("New", Some(2020), "Scopus")]).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("New"));
        assert!(!text.contains("Old"));
    }

    #[test]
    fn test_write_empty_table_still_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DUPLICATES_FILE);

        write_records(&path, &[]).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "Title,Authors,Year,Source\n");
    }
}
