//! Gene symbol resolution.
//!
//! Morbid map rows name genes by symbol, and symbols are neither unique nor
//! stable. [`GeneResolver`] turns a raw symbol into at most one canonical
//! gene id using an [`IdResolver`] backend, refusing to guess when the
//! backend reports zero or several candidates.

use std::collections::{BTreeSet, HashMap};
use std::io::Read;
use std::path::Path;

use omim_types::{GeneId, TaxonId};
use tracing::{debug, info, warn};

use crate::parser::TabularReader;
use crate::types::OmimResult;

/// A backend that knows which gene ids a symbol may refer to.
pub trait IdResolver {
    /// Returns true if the backend holds data for the organism.
    fn has_organism(&self, taxon_id: &str) -> bool;

    /// Returns the number of distinct gene ids the symbol resolves to.
    fn count_matches(&self, taxon_id: &str, symbol: &str) -> usize;

    /// Returns the gene id for a symbol with exactly one match.
    fn resolve_one(&self, taxon_id: &str, symbol: &str) -> Option<GeneId>;
}

/// A symbol that could not be resolved to a single gene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionFailure {
    /// The raw symbol from the morbid map.
    pub symbol: String,
    /// How many candidate ids the backend reported.
    pub matches: usize,
}

/// Resolves raw gene symbols for one organism.
///
/// Without a backend, or with one that has no data for the organism,
/// symbols pass through unchanged.
///
/// # Example
///
/// ```
/// use omim_loader::{GeneResolver, SymbolTable};
///
/// let mut table = SymbolTable::new("9606");
/// table.insert("2245", "FGD1", &[]);
///
/// let mut resolver = GeneResolver::new(Some(Box::new(table)), "9606");
/// assert_eq!(resolver.resolve("FGD1"), Some("2245".to_string()));
/// assert_eq!(resolver.resolve("NOPE"), None);
/// assert_eq!(resolver.failures().len(), 1);
/// ```
pub struct GeneResolver {
    backend: Option<Box<dyn IdResolver>>,
    taxon_id: TaxonId,
    failures: Vec<ResolutionFailure>,
}

impl std::fmt::Debug for GeneResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneResolver")
            .field("backend", &self.backend.is_some())
            .field("taxon_id", &self.taxon_id)
            .field("failures", &self.failures.len())
            .finish()
    }
}

impl GeneResolver {
    /// Creates a resolver over an optional backend.
    pub fn new(backend: Option<Box<dyn IdResolver>>, taxon_id: impl Into<TaxonId>) -> Self {
        let taxon_id = taxon_id.into();
        let backend = match backend {
            Some(backend) if backend.has_organism(&taxon_id) => Some(backend),
            Some(_) => {
                warn!(%taxon_id, "resolver has no data for organism, gene symbols will pass through unresolved");
                None
            }
            None => {
                warn!(%taxon_id, "no gene resolver configured, gene symbols will pass through unresolved");
                None
            }
        };

        Self {
            backend,
            taxon_id,
            failures: Vec::new(),
        }
    }

    /// Creates a resolver that passes every symbol through unchanged.
    pub fn passthrough(taxon_id: impl Into<TaxonId>) -> Self {
        Self {
            backend: None,
            taxon_id: taxon_id.into(),
            failures: Vec::new(),
        }
    }

    /// Returns true if symbols are passed through without resolution.
    pub fn is_passthrough(&self) -> bool {
        self.backend.is_none()
    }

    /// Resolves a symbol to a canonical gene id.
    ///
    /// Returns `None` for blank symbols and, with a backend, for symbols
    /// matching zero or several genes. Such failures are recorded.
    pub fn resolve(&mut self, symbol: &str) -> Option<GeneId> {
        if symbol.is_empty() {
            return None;
        }

        let Some(backend) = self.backend.as_ref() else {
            return Some(symbol.to_string());
        };

        let matches = backend.count_matches(&self.taxon_id, symbol);
        let resolved = if matches == 1 {
            backend.resolve_one(&self.taxon_id, symbol)
        } else {
            None
        };

        if resolved.is_none() {
            debug!(symbol, matches, "failed to resolve gene to one identifier, ignoring gene");
            self.failures.push(ResolutionFailure {
                symbol: symbol.to_string(),
                matches,
            });
        }
        resolved
    }

    /// Returns every failed resolution so far, in order.
    pub fn failures(&self) -> &[ResolutionFailure] {
        &self.failures
    }

    /// Returns the organism this resolver works for.
    pub fn taxon_id(&self) -> &str {
        &self.taxon_id
    }
}

/// In-memory symbol index for one organism.
///
/// Official symbols take precedence: a symbol that is the official symbol
/// of any gene only counts those genes, and synonyms are consulted only
/// when no official symbol matches.
#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    taxon_id: TaxonId,
    by_symbol: HashMap<String, BTreeSet<GeneId>>,
    by_synonym: HashMap<String, BTreeSet<GeneId>>,
}

impl SymbolTable {
    /// Creates an empty table for an organism.
    pub fn new(taxon_id: impl Into<TaxonId>) -> Self {
        Self {
            taxon_id: taxon_id.into(),
            ..Default::default()
        }
    }

    /// Adds a gene with its official symbol and synonyms.
    pub fn insert(&mut self, gene_id: &str, symbol: &str, synonyms: &[&str]) {
        self.by_symbol
            .entry(symbol.to_string())
            .or_default()
            .insert(gene_id.to_string());
        for synonym in synonyms {
            self.by_synonym
                .entry(synonym.to_string())
                .or_default()
                .insert(gene_id.to_string());
        }
    }

    /// Returns the number of genes indexed by official symbol.
    pub fn len(&self) -> usize {
        self.by_symbol.values().map(BTreeSet::len).sum()
    }

    /// Returns true if nothing has been indexed.
    pub fn is_empty(&self) -> bool {
        self.by_symbol.is_empty()
    }

    /// Loads the rows for `taxon_id` from an NCBI `gene_info` file.
    ///
    /// # Errors
    /// Returns an error if the file is missing or cannot be read.
    pub fn from_gene_info_path<P: AsRef<Path>>(path: P, taxon_id: &str) -> OmimResult<Self> {
        let reader = TabularReader::from_path(path)?;
        Self::from_gene_info_rows(reader, taxon_id)
    }

    /// Loads the rows for `taxon_id` from `gene_info` formatted data.
    ///
    /// Columns used: 0 taxon id, 1 gene id, 2 symbol, 4 `|`-separated
    /// synonyms (`-` for none). Lines starting with `#` are skipped.
    pub fn from_gene_info_reader<R: Read>(reader: R, taxon_id: &str) -> OmimResult<Self> {
        Self::from_gene_info_rows(TabularReader::from_reader(reader), taxon_id)
    }

    fn from_gene_info_rows<R: Read>(rows: TabularReader<R>, taxon_id: &str) -> OmimResult<Self> {
        let mut table = Self::new(taxon_id);
        let mut skipped = 0usize;

        for row in rows {
            let row = row?;
            let first = row.get(0).unwrap_or("");
            if first.starts_with('#') || first != taxon_id {
                continue;
            }
            let (Some(gene_id), Some(symbol)) = (row.get(1), row.get(2)) else {
                skipped += 1;
                continue;
            };
            let synonyms: Vec<&str> = match row.get(4) {
                Some("-") | None => Vec::new(),
                Some(field) => field.split('|').filter(|s| !s.is_empty()).collect(),
            };
            table.insert(gene_id, symbol, &synonyms);
        }

        info!(taxon_id, genes = table.len(), skipped, "loaded gene symbol table");
        Ok(table)
    }

    fn candidates(&self, symbol: &str) -> Option<&BTreeSet<GeneId>> {
        self.by_symbol
            .get(symbol)
            .or_else(|| self.by_synonym.get(symbol))
    }
}

impl IdResolver for SymbolTable {
    fn has_organism(&self, taxon_id: &str) -> bool {
        self.taxon_id == taxon_id && !self.is_empty()
    }

    fn count_matches(&self, taxon_id: &str, symbol: &str) -> usize {
        if self.taxon_id != taxon_id {
            return 0;
        }
        self.candidates(symbol).map_or(0, BTreeSet::len)
    }

    fn resolve_one(&self, taxon_id: &str, symbol: &str) -> Option<GeneId> {
        if self.taxon_id != taxon_id {
            return None;
        }
        match self.candidates(symbol) {
            Some(ids) if ids.len() == 1 => ids.iter().next().cloned(),
            _ => None,
        }
    }
}
