//! Entity persistence interface.
//!
//! Genes and publications are handed to the sink as soon as they are
//! created. Diseases are handed over once, after every file has been read.

use omim_types::{Disease, Gene, Publication};

use crate::types::OmimResult;

/// Receives finished entities for storage.
pub trait EntitySink {
    /// Stores a newly created gene.
    fn store_gene(&mut self, gene: &Gene) -> OmimResult<()>;

    /// Stores a newly created publication.
    fn store_publication(&mut self, publication: &Publication) -> OmimResult<()>;

    /// Stores a finalized disease.
    fn store_disease(&mut self, disease: &Disease) -> OmimResult<()>;
}

impl<S: EntitySink + ?Sized> EntitySink for &mut S {
    fn store_gene(&mut self, gene: &Gene) -> OmimResult<()> {
        (**self).store_gene(gene)
    }

    fn store_publication(&mut self, publication: &Publication) -> OmimResult<()> {
        (**self).store_publication(publication)
    }

    fn store_disease(&mut self, disease: &Disease) -> OmimResult<()> {
        (**self).store_disease(disease)
    }
}

/// Collects stored entities in memory, in the order they were stored.
#[derive(Debug, Default)]
pub struct MemorySink {
    /// Stored genes.
    pub genes: Vec<Gene>,
    /// Stored publications.
    pub publications: Vec<Publication>,
    /// Stored diseases.
    pub diseases: Vec<Disease>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }
}

impl EntitySink for MemorySink {
    fn store_gene(&mut self, gene: &Gene) -> OmimResult<()> {
        self.genes.push(gene.clone());
        Ok(())
    }

    fn store_publication(&mut self, publication: &Publication) -> OmimResult<()> {
        self.publications.push(publication.clone());
        Ok(())
    }

    fn store_disease(&mut self, disease: &Disease) -> OmimResult<()> {
        self.diseases.push(disease.clone());
        Ok(())
    }
}
