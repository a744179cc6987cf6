//! Normalization of one CSV export into canonical records.
//!
//! Handles the low-level CSV reading and the column selection: every header
//! is resolved against the source's alias map, unmapped columns are
//! discarded, and rows without a Title are dropped (and counted, never
//! silently lost).

use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::Record;
use crate::error::{ParseError, ValueError};
use crate::ingest::config::{SourceConfig, fields};

/// The outcome of normalizing a single export file.
#[derive(Debug)]
pub(crate) struct ParsedFile {
    /// Normalized records, in row order.
    pub records: Vec<Record>,
    /// Rows discarded because their Title cell was empty.
    pub dropped_missing_title: usize,
}

/// Parse the content of one export file, selecting and renaming the columns
/// defined by `config`.
///
/// Fails when the header row has no column mapping to the title field, or
/// when the CSV itself is malformed; a whole-source failure must abort the
/// run rather than skew the publication counts.
pub(crate) fn parse_source_csv(
    text: &str,
    config: &SourceConfig,
    file: &Path,
) -> Result<ParsedFile, ParseError> {
    config
        .validate()
        .map_err(|msg| ParseError::without_line(file, ValueError::Config(msg)))?;

    // Scopus writes UTF-8 exports with a BOM, which would otherwise end up
    // glued to the first header name.
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    if text.trim().is_empty() {
        return Ok(ParsedFile {
            records: Vec::new(),
            dropped_missing_title: 0,
        });
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| ParseError::from_csv(file, e))?
        .clone();

    // Column index of each canonical field, resolved once from the header row.
    let mut title_idx = None;
    let mut authors_idx = None;
    let mut year_idx = None;
    for (idx, header) in headers.iter().enumerate() {
        match config.get_field_for_header(header) {
            Some(fields::TITLE) if title_idx.is_none() => title_idx = Some(idx),
            Some(fields::AUTHORS) if authors_idx.is_none() => authors_idx = Some(idx),
            Some(fields::YEAR) if year_idx.is_none() => year_idx = Some(idx),
            _ => {}
        }
    }

    let title_idx = title_idx.ok_or_else(|| {
        ParseError::without_line(
            file,
            ValueError::MissingColumn {
                field: fields::TITLE,
            },
        )
    })?;

    let mut records = Vec::new();
    let mut dropped_missing_title = 0usize;
    // Header occupies line 1; data starts at line 2.
    let mut line_number: u64 = 2;

    for result in reader.records() {
        let row = result.map_err(|e| ParseError::from_csv(file, e))?;
        let line = row.position().map(|p| p.line()).unwrap_or(line_number);

        let title = row.get(title_idx).unwrap_or("").trim();
        if title.is_empty() {
            debug!(file = %file.display(), line, "dropping row with empty title");
            dropped_missing_title += 1;
            line_number = line + 1;
            continue;
        }

        let authors = authors_idx
            .and_then(|i| row.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);
        let year = year_idx.and_then(|i| row.get(i)).and_then(parse_year);

        records.push(Record {
            title: title.to_string(),
            authors,
            year,
            source: config.label().to_string(),
        });
        line_number = line + 1;
    }

    Ok(ParsedFile {
        records,
        dropped_missing_title,
    })
}

/// Lenient year parsing: accepts plain years and values with trailing
/// qualifiers such as "2023/5" or "2023 (online)".
pub(crate) fn parse_year(year_str: &str) -> Option<i32> {
    let year_str = year_str.trim();
    if year_str.is_empty() {
        return None;
    }

    let year_part = year_str
        .split(|c: char| !c.is_ascii_digit())
        .next()
        .unwrap_or(year_str);

    year_part.parse::<i32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::path::PathBuf;

    fn scopus_file() -> PathBuf {
        PathBuf::from("scopus_export.csv")
    }

    #[test]
    fn test_parse_scopus_basic() {
        let input = "\
Authors,Title,Year,Source title,Cited by
\"Smith J.; Doe J.\",A Study of Things,2021,Journal of Things,14
Lee K.,Another Study,2022,Thing Letters,3";

        let parsed = parse_source_csv(input, &SourceConfig::scopus(), &scopus_file()).unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.dropped_missing_title, 0);
        assert_eq!(parsed.records[0].title, "A Study of Things");
        assert_eq!(parsed.records[0].authors.as_deref(), Some("Smith J.; Doe J."));
        assert_eq!(parsed.records[0].year, Some(2021));
        assert_eq!(parsed.records[0].source, "Scopus");
    }

    #[test]
    fn test_parse_ieee_schema() {
        let input = "\
Document Title,Authors,Publication Year,Publisher
Deep Widgets,Garcia M.,2020,IEEE
Wider Widgets,Chen L.,2021,IEEE";

        let parsed = parse_source_csv(
            input,
            &SourceConfig::ieee_xplore(),
            Path::new("ieee_export.csv"),
        )
        .unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records[0].title, "Deep Widgets");
        assert_eq!(parsed.records[0].year, Some(2020));
        assert_eq!(parsed.records[0].source, "IEEE Xplore");
    }

    #[test]
    fn test_unmapped_columns_are_discarded() {
        let input = "Title,Year,Abstract,DOI\nPaper,2020,Long text,10.1/x";
        let parsed = parse_source_csv(input, &SourceConfig::scopus(), &scopus_file()).unwrap();
        assert_eq!(parsed.records.len(), 1);
        // Only the canonical fields survive; Abstract and DOI are gone.
        assert_eq!(parsed.records[0].authors, None);
    }

    #[test]
    fn test_rows_missing_title_are_dropped_and_counted() {
        let input = "Title,Year\nKept Paper,2020\n,2021\n   ,2022\nAlso Kept,2023";
        let parsed = parse_source_csv(input, &SourceConfig::scopus(), &scopus_file()).unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.dropped_missing_title, 2);
        assert_eq!(parsed.records[1].title, "Also Kept");
    }

    #[test]
    fn test_missing_title_column_is_fatal() {
        let input = "Authors,Year\nSmith J.,2020";
        let err = parse_source_csv(input, &SourceConfig::scopus(), &scopus_file()).unwrap_err();
        assert!(matches!(
            err.error,
            ValueError::MissingColumn { field: "title" }
        ));
    }

    #[test]
    fn test_malformed_row_is_fatal_with_line() {
        let input = "Title,Year\nGood Paper,2020\nBad Paper,2021,extra";
        let err = parse_source_csv(input, &SourceConfig::scopus(), &scopus_file()).unwrap_err();
        assert_eq!(err.line, Some(3));
        assert!(matches!(err.error, ValueError::Syntax(_)));
    }

    #[test]
    fn test_empty_input_yields_no_records() {
        let parsed = parse_source_csv("", &SourceConfig::scopus(), &scopus_file()).unwrap();
        assert!(parsed.records.is_empty());
        assert_eq!(parsed.dropped_missing_title, 0);
    }

    #[test]
    fn test_leading_bom_is_stripped() {
        let input = "\u{feff}Title,Year\nPaper With BOM,2020";
        let parsed = parse_source_csv(input, &SourceConfig::scopus(), &scopus_file()).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].title, "Paper With BOM");
    }

    #[test]
    fn test_quoted_fields_with_commas() {
        let input = "Title,Authors,Year\n\"Graphs, Trees, and You\",\"Doe, Jane\",2019";
        let parsed = parse_source_csv(input, &SourceConfig::scopus(), &scopus_file()).unwrap();
        assert_eq!(parsed.records[0].title, "Graphs, Trees, and You");
        assert_eq!(parsed.records[0].authors.as_deref(), Some("Doe, Jane"));
    }

    #[rstest]
    #[case("2023", Some(2023))]
    #[case(" 2023 ", Some(2023))]
    #[case("2023/5", Some(2023))]
    #[case("2023 (online)", Some(2023))]
    #[case("2023-05", Some(2023))]
    #[case("", None)]
    #[case("n.d.", None)]
    #[case("forthcoming", None)]
    fn test_parse_year(#[case] input: &str, #[case] expected: Option<i32>) {
        assert_eq!(parse_year(input), expected);
    }
}
