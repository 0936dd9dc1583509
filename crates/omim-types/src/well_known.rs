//! Well-known constants for the OMIM source.
//!
//! # Examples
//!
//! ```
//! use omim_types::well_known;
//!
//! assert_eq!(well_known::HUMAN_TAXON_ID, "9606");
//! assert_eq!(well_known::OMIM_PREFIX, "OMIM:");
//! ```

/// NCBI taxonomy id for *Homo sapiens*.
pub const HUMAN_TAXON_ID: &str = "9606";

/// Prefix prepended to a MIM number to form a disease identifier.
pub const OMIM_PREFIX: &str = "OMIM:";

/// Data source name reported as the provenance of a load.
pub const DATA_SOURCE_NAME: &str = "Online Mendelian Inheritance in Man";

/// Data set title reported as the provenance of a load.
pub const DATA_SET_TITLE: &str = "OMIM diseases";
