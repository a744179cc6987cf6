//! Per-source column-mapping configuration.
//!
//! Each citation database exports its own column names ("Title" vs
//! "Document Title", "Year" vs "Publication Year"). A [`SourceConfig`] pins
//! down the glob pattern that discovers a source's export files and the
//! static mapping from its column names to the canonical fields. Mappings
//! are fixed per source type; an unseen schema requires a new config, not
//! inference.

use std::collections::HashMap;

/// Canonical field names used by the normalizer.
pub(crate) mod fields {
    pub const TITLE: &str = "title";
    pub const AUTHORS: &str = "authors";
    pub const YEAR: &str = "year";
}

/// Header aliases used by Scopus exports.
const SCOPUS_HEADERS: &[(&str, &[&str])] = &[
    ("title", &["title", "article title"]),
    ("authors", &["authors", "author(s)", "author full names"]),
    ("year", &["year", "publication year"]),
];

/// Header aliases used by IEEE Xplore exports.
const IEEE_XPLORE_HEADERS: &[(&str, &[&str])] = &[
    ("title", &["document title", "title"]),
    ("authors", &["authors", "author(s)"]),
    ("year", &["publication year", "year"]),
];

/// Configuration for one source database: display label, filename glob
/// pattern, and header mappings.
///
/// Header lookup is case-insensitive through a prebuilt reverse map.
///
/// # Examples
///
/// ```
/// use litmerge::ingest::SourceConfig;
///
/// let mut config = SourceConfig::new("ACM DL", "acm*.csv");
/// config.set_header_mapping("title", vec!["item title".to_string()]);
/// assert_eq!(config.get_field_for_header("Item Title"), Some("title"));
/// ```
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Label identifying the database, written into every record's Source
    /// column.
    pub(crate) label: String,
    /// Filename glob pattern that discovers this source's export files.
    pub(crate) pattern: String,
    /// Canonical field -> column-name aliases.
    pub(crate) header_map: HashMap<String, Vec<String>>,
    /// Lowercased column name -> canonical field, for O(1) lookup.
    pub(crate) reverse_map: HashMap<String, String>,
}

impl SourceConfig {
    /// Creates a configuration with no header mappings.
    #[must_use]
    pub fn new(label: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            pattern: pattern.into(),
            header_map: HashMap::new(),
            reverse_map: HashMap::new(),
        }
    }

    /// The built-in Scopus export configuration.
    #[must_use]
    pub fn scopus() -> Self {
        Self::from_table("Scopus", "scopus*.csv", SCOPUS_HEADERS)
    }

    /// The built-in IEEE Xplore export configuration.
    #[must_use]
    pub fn ieee_xplore() -> Self {
        Self::from_table("IEEE Xplore", "ieee*.csv", IEEE_XPLORE_HEADERS)
    }

    fn from_table(label: &str, pattern: &str, table: &[(&str, &[&str])]) -> Self {
        let mut config = Self::new(label, pattern);
        for (field, aliases) in table {
            config.header_map.insert(
                field.to_string(),
                aliases.iter().map(|s| s.to_string()).collect(),
            );
        }
        config.rebuild_reverse_map();
        config
    }

    /// The source label written into every normalized record.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The filename glob pattern for this source's exports.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// A filesystem-safe slug of the label, used in chart file names.
    pub fn slug(&self) -> String {
        self.label
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '_'
                }
            })
            .collect()
    }

    /// Rebuild the reverse lookup map after header mappings change.
    fn rebuild_reverse_map(&mut self) {
        self.reverse_map.clear();
        for (field, aliases) in &self.header_map {
            for alias in aliases {
                self.reverse_map.insert(alias.to_lowercase(), field.clone());
            }
        }
    }

    /// Sets a custom header mapping, replacing existing aliases for `field`.
    pub fn set_header_mapping(&mut self, field: &str, aliases: Vec<String>) -> &mut Self {
        self.header_map.insert(field.to_string(), aliases);
        self.rebuild_reverse_map();
        self
    }

    /// Adds additional aliases to an existing field mapping.
    pub fn add_header_aliases(&mut self, field: &str, aliases: Vec<String>) -> &mut Self {
        self.header_map
            .entry(field.to_string())
            .or_default()
            .extend(aliases);
        self.rebuild_reverse_map();
        self
    }

    /// Finds the canonical field for a column name, case-insensitively.
    pub fn get_field_for_header(&self, header: &str) -> Option<&str> {
        let header_lower = header.trim().to_lowercase();
        self.reverse_map.get(&header_lower).map(|s| s.as_str())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.label.trim().is_empty() {
            return Err("source label is empty".to_string());
        }
        if self.pattern.trim().is_empty() {
            return Err(format!("source '{}' has an empty glob pattern", self.label));
        }
        if !self.header_map.contains_key(fields::TITLE) {
            return Err(format!(
                "source '{}' has no mapping for the title field",
                self.label
            ));
        }

        for (field, aliases) in &self.header_map {
            if field.is_empty() {
                return Err("empty field name found in mappings".to_string());
            }
            if aliases.is_empty() {
                return Err(format!("field '{}' has no aliases defined", field));
            }
            for alias in aliases {
                if alias.is_empty() {
                    return Err(format!("empty alias found for field '{}'", field));
                }
            }
        }

        // Reject aliases mapped to more than one field.
        let mut all_aliases: HashMap<String, &String> = HashMap::new();
        for (field, aliases) in &self.header_map {
            for alias in aliases {
                let alias_lower = alias.to_lowercase();
                if let Some(existing_field) = all_aliases.get(&alias_lower)
                    && *existing_field != field
                {
                    return Err(format!(
                        "alias '{}' is mapped to both '{}' and '{}'",
                        alias, existing_field, field
                    ));
                }
                all_aliases.insert(alias_lower, field);
            }
        }

        Ok(())
    }
}

/// The built-in source families, in merge order.
///
/// Declaration order matters: it is the tie-break order for "first
/// occurrence wins" deduplication.
#[must_use]
pub fn builtin_sources() -> Vec<SourceConfig> {
    vec![SourceConfig::scopus(), SourceConfig::ieee_xplore()]
}
