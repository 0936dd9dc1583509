//! Gene entity.

use crate::{GeneId, TaxonId};

/// A gene linked to one or more diseases.
///
/// Only ever created for symbols that resolved to exactly one identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Gene {
    /// Canonical resolved identifier.
    pub primary_identifier: GeneId,
    /// Taxonomy id of the organism.
    pub organism: TaxonId,
}

impl Gene {
    /// Creates a gene for a resolved identifier.
    pub fn new(primary_identifier: impl Into<GeneId>, organism: impl Into<TaxonId>) -> Self {
        Self {
            primary_identifier: primary_identifier.into(),
            organism: organism.into(),
        }
    }
}
