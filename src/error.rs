//! Error types for the merge pipeline.
//!
//! All failures in this crate are deterministic data-shape or filesystem
//! problems, so there are no retryable variants: a run either completes or
//! aborts before writing any output of the current stage.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for pipeline operations.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid glob pattern \"{pattern}\": {message}")]
    Pattern { pattern: String, message: String },

    #[error("failed to export {path}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[cfg(feature = "charts")]
    #[error("failed to render chart {path}: {message}")]
    Chart { path: PathBuf, message: String },
}

/// Parse error with file and line context.
///
/// Carries enough information to locate the offending row in the original
/// export (file path plus a 1-based line number where available).
#[derive(Error, Debug)]
#[error("error in {}{}: {error}", file.display(),
    match line {
        Some(l) => format!(" at line {}", l),
        None => String::new(),
    }
)]
pub struct ParseError {
    /// The input file being parsed.
    pub file: PathBuf,
    /// Line number where the error occurred (1-based, None if not available).
    pub line: Option<u64>,
    /// The specific error that occurred.
    pub error: ValueError,
}

impl ParseError {
    /// Create a ParseError at a specific line.
    pub fn at_line(file: impl Into<PathBuf>, line: u64, error: ValueError) -> Self {
        Self {
            file: file.into(),
            line: Some(line),
            error,
        }
    }

    /// Create a ParseError without line information.
    pub fn without_line(file: impl Into<PathBuf>, error: ValueError) -> Self {
        Self {
            file: file.into(),
            line: None,
            error,
        }
    }

    /// Wrap a `csv::Error`, extracting its line position when present.
    pub fn from_csv(file: impl Into<PathBuf>, err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line());
        Self {
            file: file.into(),
            line,
            error: ValueError::Syntax(err.to_string()),
        }
    }
}

/// Specific value-level errors that can occur while normalizing an export.
#[derive(Error, Debug)]
pub enum ValueError {
    #[error("bad syntax: {0}")]
    Syntax(String),

    #[error("no column maps to the required \"{field}\" field")]
    MissingColumn { field: &'static str },

    #[error("invalid source configuration: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display_with_line() {
        let error = ParseError::at_line(
            "scopus_export.csv",
            42,
            ValueError::Syntax("unequal field count".to_string()),
        );

        let display = format!("{}", error);
        assert!(display.contains("scopus_export.csv"));
        assert!(display.contains("line 42"));
        assert!(display.contains("unequal field count"));
    }

    #[test]
    fn test_parse_error_display_without_line() {
        let error = ParseError::without_line(
            "ieee_export.csv",
            ValueError::MissingColumn { field: "title" },
        );

        let display = format!("{}", error);
        assert!(display.contains("ieee_export.csv"));
        assert!(!display.contains("line"));
        assert!(display.contains("\"title\""));
    }

    #[test]
    fn test_csv_error_conversion_carries_line() {
        let csv_content = "a,b\n1,2,3";
        let mut reader = csv::Reader::from_reader(csv_content.as_bytes());
        let result = reader.records().next();

        if let Some(Err(csv_err)) = result {
            let parse_err = ParseError::from_csv("input.csv", csv_err);
            assert!(parse_err.line.is_some());
            assert!(matches!(parse_err.error, ValueError::Syntax(_)));
        } else {
            panic!("expected a CSV error for the uneven row");
        }
    }
}
