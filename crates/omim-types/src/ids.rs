//! Identifier types used across the disease graph.

/// A MIM number: the six-digit catalog identifier of an OMIM entry.
///
/// Kept as the raw string from the source files so that leading zeros
/// and the exact spelling survive.
pub type MimNumber = String;

/// A canonical gene identifier as assigned by the resolver (for human
/// genes this is an NCBI Gene id such as `"2245"`).
pub type GeneId = String;

/// A PubMed citation id.
pub type PubMedId = String;

/// An NCBI taxonomy id, e.g. `"9606"` for human.
pub type TaxonId = String;

/// Returns true if `value` is exactly six ASCII digits.
///
/// ```
/// use omim_types::is_mim_number;
///
/// assert!(is_mim_number("100070"));
/// assert!(!is_mim_number("10007"));
/// assert!(!is_mim_number("not-a-mim"));
/// ```
pub fn is_mim_number(value: &str) -> bool {
    value.len() == 6 && value.bytes().all(|b| b.is_ascii_digit())
}
