//! Deduplicating entity cache.
//!
//! Holds one map per entity kind. Each `get_or_create_*` method is the
//! only way an entity of that kind comes into existence, so every key maps
//! to exactly one entity for the lifetime of a load.
//!
//! The cache is plain owned state with no interior locking. Share it across
//! threads only behind a lock.

use std::collections::HashMap;

use omim_types::{Disease, Gene, GeneId, MimNumber, PubMedId, Publication, TaxonId};
use tracing::debug;

use crate::sink::EntitySink;
use crate::types::{OmimConfig, OmimResult};

/// Diseases by MIM number, genes by resolved id and publications by
/// PubMed id.
///
/// # Example
///
/// ```
/// use omim_loader::{EntityCache, MemorySink};
///
/// let mut cache = EntityCache::new("OMIM:", "9606");
/// let mut sink = MemorySink::new();
///
/// cache.get_or_create_disease("100070").set_name("Foo");
/// cache.get_or_create_gene("2245", &mut sink).unwrap();
/// cache.get_or_create_gene("2245", &mut sink).unwrap();
///
/// assert_eq!(cache.disease_count(), 1);
/// assert_eq!(cache.gene_count(), 1);
/// assert_eq!(sink.genes.len(), 1);
/// ```
pub struct EntityCache {
    identifier_prefix: String,
    organism: TaxonId,
    diseases: HashMap<MimNumber, Disease>,
    genes: HashMap<GeneId, Gene>,
    publications: HashMap<PubMedId, Publication>,
}

impl std::fmt::Debug for EntityCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityCache")
            .field("identifier_prefix", &self.identifier_prefix)
            .field("organism", &self.organism)
            .field("diseases", &self.diseases.len())
            .field("genes", &self.genes.len())
            .field("publications", &self.publications.len())
            .finish()
    }
}

impl EntityCache {
    /// Creates an empty cache.
    pub fn new(identifier_prefix: impl Into<String>, organism: impl Into<TaxonId>) -> Self {
        Self {
            identifier_prefix: identifier_prefix.into(),
            organism: organism.into(),
            diseases: HashMap::new(),
            genes: HashMap::new(),
            publications: HashMap::new(),
        }
    }

    /// Creates an empty cache using the prefix and organism from a config.
    pub fn from_config(config: &OmimConfig) -> Self {
        Self::new(config.identifier_prefix.clone(), config.taxon_id.clone())
    }

    /// Returns the disease for a MIM number, creating it if needed.
    pub fn get_or_create_disease(&mut self, mim_number: &str) -> &mut Disease {
        let prefix = &self.identifier_prefix;
        self.diseases
            .entry(mim_number.to_string())
            .or_insert_with(|| {
                debug!(mim_number, "creating disease");
                Disease::new(mim_number, prefix)
            })
    }

    /// Returns the gene for a resolved id, creating and storing it if needed.
    ///
    /// # Errors
    /// Returns an error if the sink fails to store a new gene.
    pub fn get_or_create_gene<S: EntitySink + ?Sized>(
        &mut self,
        gene_id: &str,
        sink: &mut S,
    ) -> OmimResult<&Gene> {
        if !self.genes.contains_key(gene_id) {
            let gene = Gene::new(gene_id, self.organism.as_str());
            sink.store_gene(&gene)?;
            self.genes.insert(gene_id.to_string(), gene);
        }
        Ok(&self.genes[gene_id])
    }

    /// Returns the publication for a PubMed id, creating and storing it if needed.
    ///
    /// # Errors
    /// Returns an error if the sink fails to store a new publication.
    pub fn get_or_create_publication<S: EntitySink + ?Sized>(
        &mut self,
        pubmed_id: &str,
        sink: &mut S,
    ) -> OmimResult<&Publication> {
        if !self.publications.contains_key(pubmed_id) {
            let publication = Publication::new(pubmed_id);
            sink.store_publication(&publication)?;
            self.publications.insert(pubmed_id.to_string(), publication);
        }
        Ok(&self.publications[pubmed_id])
    }

    /// Returns true if a disease exists for the MIM number.
    pub fn has_disease(&self, mim_number: &str) -> bool {
        self.diseases.contains_key(mim_number)
    }

    /// Gets a disease by MIM number.
    pub fn get_disease(&self, mim_number: &str) -> Option<&Disease> {
        self.diseases.get(mim_number)
    }

    /// Gets a disease by MIM number for modification. Never creates one.
    pub fn get_disease_mut(&mut self, mim_number: &str) -> Option<&mut Disease> {
        self.diseases.get_mut(mim_number)
    }

    /// Gets a gene by resolved id.
    pub fn get_gene(&self, gene_id: &str) -> Option<&Gene> {
        self.genes.get(gene_id)
    }

    /// Gets a publication by PubMed id.
    pub fn get_publication(&self, pubmed_id: &str) -> Option<&Publication> {
        self.publications.get(pubmed_id)
    }

    /// Returns the number of diseases.
    pub fn disease_count(&self) -> usize {
        self.diseases.len()
    }

    /// Returns the number of genes.
    pub fn gene_count(&self) -> usize {
        self.genes.len()
    }

    /// Returns the number of publications.
    pub fn publication_count(&self) -> usize {
        self.publications.len()
    }

    /// Returns an iterator over all diseases in arbitrary order.
    pub fn diseases(&self) -> impl Iterator<Item = &Disease> {
        self.diseases.values()
    }

    /// Consumes the cache, returning its diseases ordered by MIM number.
    pub fn into_sorted_diseases(self) -> Vec<Disease> {
        let mut diseases: Vec<Disease> = self.diseases.into_values().collect();
        diseases.sort_by(|a, b| a.mim_number.cmp(&b.mim_number));
        diseases
    }
}

/// State threaded through every phase of a load: the cache and the sink
/// that receives entities.
#[derive(Debug)]
pub struct PipelineContext<S: EntitySink> {
    /// The entity cache.
    pub cache: EntityCache,
    /// Where entities are stored.
    pub sink: S,
}

impl<S: EntitySink> PipelineContext<S> {
    /// Creates a context from a cache and a sink.
    pub fn new(cache: EntityCache, sink: S) -> Self {
        Self { cache, sink }
    }

    /// Creates a context with an empty cache configured from `config`.
    pub fn from_config(config: &OmimConfig, sink: S) -> Self {
        Self::new(EntityCache::from_config(config), sink)
    }

    /// Hands every disease to the sink, ordered by MIM number, and returns
    /// the sink.
    ///
    /// # Errors
    /// Returns the first error reported by the sink.
    pub fn finish(self) -> OmimResult<S> {
        let Self { cache, mut sink } = self;
        for disease in cache.into_sorted_diseases() {
            sink.store_disease(&disease)?;
        }
        Ok(sink)
    }
}
