//! Loader-specific types: errors, configuration and statistics.

use std::collections::BTreeMap;
use std::path::PathBuf;

use omim_types::{well_known, MapKey, TaxonId};
use thiserror::Error;

/// Errors that can occur while loading OMIM files.
#[derive(Error, Debug)]
pub enum OmimError {
    /// I/O error reading or writing a file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the tab-delimited reader, including stream failures.
    #[error("Tabular read error: {0}")]
    Csv(#[from] csv::Error),

    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Directory not found.
    #[error("Directory not found: {path}")]
    DirectoryNotFound {
        /// The path that was not found.
        path: String,
    },

    /// One or more required OMIM files are missing.
    #[error("Not all required OMIM files were found in {directory}, missing: {files}")]
    RequiredFilesMissing {
        /// Comma-separated names of the missing files.
        files: String,
        /// The directory that was searched.
        directory: String,
    },

    /// A row had an unexpected number of columns.
    #[error("{file} line {line}: expected {expected} columns, found {found}")]
    MalformedRow {
        /// Which file the row came from.
        file: &'static str,
        /// 1-based line number, 0 if unknown.
        line: u64,
        /// Expected column count (minimum or exact, depending on file).
        expected: usize,
        /// Found column count.
        found: usize,
    },

    /// A MIM number column did not hold six digits.
    #[error("{file} line {line}: invalid MIM number {value:?}")]
    InvalidMimNumber {
        /// Which file the row came from.
        file: &'static str,
        /// 1-based line number, 0 if unknown.
        line: u64,
        /// The rejected value.
        value: String,
    },

    /// The entity sink rejected an entity.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for OMIM loading operations.
pub type OmimResult<T> = Result<T, OmimError>;

/// Configuration for an OMIM load.
#[derive(Debug, Clone)]
pub struct OmimConfig {
    /// Organism all genes belong to.
    pub taxon_id: TaxonId,
    /// Prefix for disease identifiers.
    pub identifier_prefix: String,
    /// Name of the data source the entities come from.
    pub data_source: String,
    /// Title of the data set the entities come from.
    pub data_set: String,
    /// File name of the titles export.
    pub titles_file: String,
    /// File name of the morbid map export.
    pub morbidmap_file: String,
    /// File name of the PubMed citation export.
    pub pubmed_file: String,
    /// Where unresolved morbid map rows are written, if anywhere.
    pub unresolved_path: Option<PathBuf>,
    /// Pre-parse morbid map rows in parallel. Needs the `parallel` feature.
    pub parallel: bool,
}

impl Default for OmimConfig {
    fn default() -> Self {
        Self {
            taxon_id: well_known::HUMAN_TAXON_ID.to_string(),
            identifier_prefix: well_known::OMIM_PREFIX.to_string(),
            data_source: well_known::DATA_SOURCE_NAME.to_string(),
            data_set: well_known::DATA_SET_TITLE.to_string(),
            titles_file: "mimTitles.txt".to_string(),
            morbidmap_file: "morbidmap.txt".to_string(),
            pubmed_file: "pubmed_cited".to_string(),
            unresolved_path: None,
            parallel: false,
        }
    }
}

impl OmimConfig {
    /// Returns the required file names in processing order.
    pub fn required_files(&self) -> [&str; 3] {
        [
            self.morbidmap_file.as_str(),
            self.titles_file.as_str(),
            self.pubmed_file.as_str(),
        ]
    }
}

/// Resolved and total row counts for one map key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapKeyCounts {
    /// Rows linked into the graph.
    pub resolved: usize,
    /// Rows carrying this key.
    pub total: usize,
}

impl MapKeyCounts {
    /// Returns the percentage of rows that were linked.
    pub fn resolution_rate(&self) -> f64 {
        percentage(self.resolved, self.total)
    }
}

/// Statistics from linking a morbid map file.
#[derive(Debug, Clone, Default)]
pub struct MapFileStats {
    /// Rows read.
    pub rows: usize,
    /// Rows without a trailing map key.
    pub unclassified: usize,
    /// Per map key counts.
    pub by_map_key: BTreeMap<MapKey, MapKeyCounts>,
    /// Rows whose gene symbol resolved.
    pub genes_resolved: usize,
    /// Six-digit runs found across all rows.
    pub disease_matches: usize,
    /// Distinct MIM numbers that received a gene.
    pub unique_diseases: usize,
    /// Rows written to the diagnostics sink.
    pub unresolved_rows: usize,
    /// Rows linked into the graph.
    pub linked_rows: usize,
}

impl MapFileStats {
    /// Returns the percentage of rows that were linked.
    pub fn resolution_rate(&self) -> f64 {
        percentage(self.linked_rows, self.rows)
    }

    /// Formats the per map key counts as `(3): 10 / 12  (1): 0 / 4`.
    pub fn map_key_summary(&self) -> String {
        self.by_map_key
            .iter()
            .map(|(key, counts)| format!("{key}: {} / {}", counts.resolved, counts.total))
            .collect::<Vec<_>>()
            .join("  ")
    }
}

/// Statistics from loading a titles file.
#[derive(Debug, Clone, Copy, Default)]
pub struct TitleStats {
    /// Rows read, including headers.
    pub rows: usize,
    /// Header rows skipped.
    pub headers: usize,
    /// Rows rejected for too few columns or an invalid MIM number.
    pub malformed: usize,
    /// Diseases that received a name.
    pub named: usize,
    /// Synonyms added.
    pub synonyms: usize,
}

/// Statistics from linking a citation file.
#[derive(Debug, Clone, Copy, Default)]
pub struct CitationStats {
    /// Rows read.
    pub rows: usize,
    /// Rows without exactly three columns or with an invalid MIM number.
    pub malformed: usize,
    /// Rows skipped because the disease was not already known.
    pub unknown_disease: usize,
    /// Citation groups attached to diseases.
    pub groups: usize,
    /// Citations attached across all groups.
    pub citations: usize,
}

/// The three OMIM exports located in a data directory.
#[derive(Debug, Clone)]
pub struct OmimFiles {
    /// Path to the morbid map file.
    pub morbidmap_file: PathBuf,
    /// Path to the titles file.
    pub titles_file: PathBuf,
    /// Path to the PubMed citation file.
    pub pubmed_file: PathBuf,
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = OmimConfig::default();
        assert_eq!(config.taxon_id, "9606");
        assert_eq!(config.identifier_prefix, "OMIM:");
        assert_eq!(
            config.required_files(),
            ["morbidmap.txt", "mimTitles.txt", "pubmed_cited"]
        );
        assert!(config.unresolved_path.is_none());
    }

    #[test]
    fn test_map_key_counts_rate() {
        let counts = MapKeyCounts {
            resolved: 3,
            total: 4,
        };
        assert!((counts.resolution_rate() - 75.0).abs() < 0.01);
        assert_eq!(MapKeyCounts::default().resolution_rate(), 0.0);
    }

    #[test]
    fn test_map_key_summary() {
        let mut stats = MapFileStats::default();
        stats.by_map_key.insert(
            MapKey::MolecularBasis,
            MapKeyCounts {
                resolved: 10,
                total: 12,
            },
        );
        stats.by_map_key.insert(
            MapKey::Association,
            MapKeyCounts {
                resolved: 0,
                total: 4,
            },
        );
        assert_eq!(stats.map_key_summary(), "(1): 0 / 4  (3): 10 / 12");
    }
}
