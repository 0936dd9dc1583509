//! # omim-loader
//!
//! Links the OMIM flat-file exports into a single disease graph.
//!
//! Three tab-delimited files are read, strictly in this order:
//!
//! 1. `morbidmap.txt`: links diseases to genes, resolving gene symbols to
//!    stable ids ([`MapFileLinker`]).
//! 2. `mimTitles.txt`: names diseases and records their synonyms
//!    ([`load_titles`]).
//! 3. `pubmed_cited`: attaches citations to diseases already known
//!    ([`CitationLinker`]).
//!
//! Every entity lives in an [`EntityCache`] keyed by its natural id, so a
//! MIM number, gene id or PubMed id maps to exactly one entity per load.
//! Finished entities are handed to an [`EntitySink`].
//!
//! ## Features
//!
//! - `parallel` (default): parallel pre-parsing of morbid map rows via rayon.

#![warn(missing_docs)]

mod cache;
mod citations;
mod loader;
mod morbidmap;
mod parser;
mod pipeline;
mod resolver;
mod sink;
mod titles;
mod types;

pub use cache::{EntityCache, PipelineContext};
pub use citations::{CitationLinker, CitationRow};
pub use loader::discover_omim_files;
pub use morbidmap::{MapEntry, MapFileLinker};
pub use parser::{line_of, pipe_joined, TabularReader};
pub use pipeline::{Pipeline, RunSummary};
pub use resolver::{GeneResolver, IdResolver, ResolutionFailure, SymbolTable};
pub use sink::{EntitySink, MemorySink};
pub use titles::{load_titles, TitleRow};
pub use types::{
    CitationStats, MapFileStats, MapKeyCounts, OmimConfig, OmimError, OmimFiles, OmimResult,
    TitleStats,
};

// Re-export omim-types for convenience
pub use omim_types;
