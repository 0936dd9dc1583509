//! OMIM disease entity.

use crate::{GeneId, MimNumber, PubMedId};

/// A disease assembled from the OMIM title, morbid map and citation files.
///
/// Created on first reference to its MIM number and filled in as each file
/// is processed.
///
/// # Examples
///
/// ```
/// use omim_types::Disease;
///
/// let mut disease = Disease::new("100070", "OMIM:");
/// disease.add_gene("2245".to_string());
/// disease.add_gene("2245".to_string());
///
/// assert_eq!(disease.identifier, "OMIM:100070");
/// assert_eq!(disease.genes.len(), 2);
/// assert!(disease.name.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Disease {
    /// Prefixed identifier, e.g. `OMIM:100070`.
    pub identifier: String,
    /// The raw MIM number this disease is keyed by.
    pub mim_number: MimNumber,
    /// Preferred title; absent until the titles file has been read.
    pub name: Option<String>,
    /// Alternative titles, without duplicates, in first-seen order.
    pub synonyms: Vec<String>,
    /// Linked genes in discovery order. Not deduplicated.
    pub genes: Vec<GeneId>,
    /// Cited publications for the most recent citation group.
    pub publications: Vec<PubMedId>,
}

impl Disease {
    /// Creates an empty disease for a MIM number.
    pub fn new(mim_number: impl Into<MimNumber>, prefix: &str) -> Self {
        let mim_number = mim_number.into();
        Self {
            identifier: format!("{prefix}{mim_number}"),
            mim_number,
            name: None,
            synonyms: Vec::new(),
            genes: Vec::new(),
            publications: Vec::new(),
        }
    }

    /// Sets the preferred title.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Adds an alternative title.
    ///
    /// Returns false if the synonym was already present.
    pub fn add_synonym(&mut self, synonym: impl Into<String>) -> bool {
        let synonym = synonym.into();
        if self.synonyms.contains(&synonym) {
            return false;
        }
        self.synonyms.push(synonym);
        true
    }

    /// Appends a gene reference.
    pub fn add_gene(&mut self, gene: GeneId) {
        self.genes.push(gene);
    }

    /// Replaces the publication collection.
    pub fn set_publications(&mut self, publications: Vec<PubMedId>) {
        self.publications = publications;
    }

    /// Returns true if at least one gene is linked.
    pub fn has_genes(&self) -> bool {
        !self.genes.is_empty()
    }
}
