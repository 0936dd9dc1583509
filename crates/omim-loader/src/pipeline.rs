//! End-to-end OMIM load.
//!
//! Runs the three phases strictly in order: morbid map, titles, citations.
//! The citation phase only annotates diseases created earlier, so each file
//! is read to the end before the next one is opened for reading.
//!
//! ```no_run
//! use omim_loader::{GeneResolver, MemorySink, OmimConfig, Pipeline};
//!
//! fn main() -> omim_loader::OmimResult<()> {
//!     let config = OmimConfig::default();
//!     let resolver = GeneResolver::passthrough(config.taxon_id.clone());
//!     let mut pipeline = Pipeline::new(config, resolver, MemorySink::new());
//!
//!     let summary = pipeline.run_dir("/data/omim")?;
//!     println!("{} diseases", summary.diseases);
//!
//!     let sink = pipeline.finish()?;
//!     println!("{} stored", sink.diseases.len());
//!     Ok(())
//! }
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use csv::StringRecord;
use tracing::info;

use crate::cache::PipelineContext;
use crate::citations::CitationLinker;
use crate::loader::discover_omim_files;
use crate::morbidmap::MapFileLinker;
use crate::parser::TabularReader;
use crate::resolver::GeneResolver;
use crate::sink::EntitySink;
use crate::titles::load_titles;
use crate::types::{CitationStats, MapFileStats, OmimConfig, OmimFiles, OmimResult, TitleStats};

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Data source the entities were loaded from.
    pub data_source: String,
    /// Data set the entities were loaded from.
    pub data_set: String,
    /// Morbid map statistics.
    pub map_file: MapFileStats,
    /// Titles statistics.
    pub titles: TitleStats,
    /// Citation statistics.
    pub citations: CitationStats,
    /// Symbols that did not resolve to exactly one gene.
    pub resolution_failures: usize,
    /// Diseases in the cache.
    pub diseases: usize,
    /// Genes in the cache.
    pub genes: usize,
    /// Publications in the cache.
    pub publications: usize,
}

/// Owns the resolver and the pipeline context for one load.
#[derive(Debug)]
pub struct Pipeline<S: EntitySink> {
    config: OmimConfig,
    resolver: GeneResolver,
    context: PipelineContext<S>,
}

impl<S: EntitySink> Pipeline<S> {
    /// Creates a pipeline with an empty cache.
    pub fn new(config: OmimConfig, resolver: GeneResolver, sink: S) -> Self {
        let context = PipelineContext::from_config(&config, sink);
        Self {
            config,
            resolver,
            context,
        }
    }

    /// Loads the OMIM files from a data directory.
    ///
    /// Unresolved morbid map rows go to `config.unresolved_path` when set
    /// and are discarded otherwise.
    ///
    /// # Errors
    /// Fails before reading anything if a required file is missing.
    pub fn run_dir<P: AsRef<Path>>(&mut self, path: P) -> OmimResult<RunSummary> {
        let files = discover_omim_files(path, &self.config)?;

        match self.config.unresolved_path.clone() {
            Some(unresolved_path) => {
                info!("Writing unresolved morbid map rows to {}", unresolved_path.display());
                let mut diagnostics = BufWriter::new(File::create(unresolved_path)?);
                self.run_files(&files, &mut diagnostics)
            }
            None => self.run_files(&files, &mut io::sink()),
        }
    }

    /// Loads the given files, writing unresolved morbid map rows to `diagnostics`.
    ///
    /// # Errors
    /// Fails before reading anything if any file cannot be opened.
    pub fn run_files<W: Write + ?Sized>(
        &mut self,
        files: &OmimFiles,
        diagnostics: &mut W,
    ) -> OmimResult<RunSummary> {
        let morbidmap = TabularReader::from_path(&files.morbidmap_file)?;
        let titles = TabularReader::from_path(&files.titles_file)?;
        let citations = TabularReader::from_path(&files.pubmed_file)?;
        self.run(morbidmap, titles, citations, diagnostics)
    }

    /// Runs the three phases over already opened row sources.
    ///
    /// # Errors
    /// Stops at the first read, storage or diagnostics write error.
    pub fn run<M, T, C, W>(
        &mut self,
        morbidmap: M,
        titles: T,
        citations: C,
        diagnostics: &mut W,
    ) -> OmimResult<RunSummary>
    where
        M: IntoIterator<Item = OmimResult<StringRecord>>,
        T: IntoIterator<Item = OmimResult<StringRecord>>,
        C: IntoIterator<Item = OmimResult<StringRecord>>,
        W: Write + ?Sized,
    {
        let map_file = self.link_morbidmap(morbidmap, diagnostics)?;
        let titles = load_titles(&mut self.context, titles)?;
        let citations = CitationLinker::new().link(&mut self.context, citations)?;

        let summary = RunSummary {
            data_source: self.config.data_source.clone(),
            data_set: self.config.data_set.clone(),
            map_file,
            titles,
            citations,
            resolution_failures: self.resolver.failures().len(),
            diseases: self.context.cache.disease_count(),
            genes: self.context.cache.gene_count(),
            publications: self.context.cache.publication_count(),
        };

        info!(
            "{} ({}) load complete: {} diseases, {} genes, {} publications ({:.1}% of morbid map rows linked, {} unresolved symbols)",
            summary.data_set,
            summary.data_source,
            summary.diseases,
            summary.genes,
            summary.publications,
            summary.map_file.resolution_rate(),
            summary.resolution_failures
        );
        Ok(summary)
    }

    #[cfg(feature = "parallel")]
    fn link_morbidmap<M, W>(&mut self, rows: M, diagnostics: &mut W) -> OmimResult<MapFileStats>
    where
        M: IntoIterator<Item = OmimResult<StringRecord>>,
        W: Write + ?Sized,
    {
        let linker = MapFileLinker::new(&mut self.resolver, diagnostics);
        if self.config.parallel {
            linker.link_parallel(&mut self.context, rows)
        } else {
            linker.link(&mut self.context, rows)
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn link_morbidmap<M, W>(&mut self, rows: M, diagnostics: &mut W) -> OmimResult<MapFileStats>
    where
        M: IntoIterator<Item = OmimResult<StringRecord>>,
        W: Write + ?Sized,
    {
        if self.config.parallel {
            tracing::warn!("parallel parsing requested but the `parallel` feature is disabled");
        }
        MapFileLinker::new(&mut self.resolver, diagnostics).link(&mut self.context, rows)
    }

    /// Returns the pipeline context.
    pub fn context(&self) -> &PipelineContext<S> {
        &self.context
    }

    /// Returns the gene resolver.
    pub fn resolver(&self) -> &GeneResolver {
        &self.resolver
    }

    /// Hands every disease to the sink and returns it.
    ///
    /// # Errors
    /// Returns the first error reported by the sink.
    pub fn finish(self) -> OmimResult<S> {
        self.context.finish()
    }
}
