//! Publication entity.

use crate::PubMedId;

/// A publication cited by an OMIM entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Publication {
    /// PubMed id of the citation.
    pub pubmed_id: PubMedId,
}

impl Publication {
    /// Creates a publication for a PubMed id.
    pub fn new(pubmed_id: impl Into<PubMedId>) -> Self {
        Self {
            pubmed_id: pubmed_id.into(),
        }
    }
}
