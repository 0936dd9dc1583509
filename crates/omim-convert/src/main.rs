//! OMIM converter binary.
//!
//! Configuration comes from the environment:
//!
//! - `OMIM_DATA_PATH`: directory holding `morbidmap.txt`, `mimTitles.txt`
//!   and `pubmed_cited` (required).
//! - `OMIM_GENE_INFO`: NCBI `gene_info` file used to resolve gene symbols.
//!   Without it symbols are used as gene ids unchanged.
//! - `OMIM_UNRESOLVED_PATH`: where unlinkable morbid map rows are written.
//!   Defaults to `omim_not_loaded.txt` in the system temp directory.
//! - `RUST_LOG`: log filter, `info` by default.

use std::path::PathBuf;

use omim_loader::{GeneResolver, IdResolver, MemorySink, OmimConfig, Pipeline, SymbolTable};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const UNRESOLVED_FILE_NAME: &str = "omim_not_loaded.txt";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let data_path = std::env::var("OMIM_DATA_PATH")
        .map_err(|_| "OMIM_DATA_PATH must point to a directory of OMIM exports")?;

    let unresolved_path = std::env::var("OMIM_UNRESOLVED_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| std::env::temp_dir().join(UNRESOLVED_FILE_NAME));

    let config = OmimConfig {
        unresolved_path: Some(unresolved_path),
        parallel: true,
        ..Default::default()
    };

    let backend: Option<Box<dyn IdResolver>> = match std::env::var("OMIM_GENE_INFO") {
        Ok(path) => {
            tracing::info!("Loading gene symbols from: {}", path);
            Some(Box::new(SymbolTable::from_gene_info_path(&path, &config.taxon_id)?))
        }
        Err(_) => None,
    };
    let resolver = GeneResolver::new(backend, config.taxon_id.clone());

    tracing::info!("Loading OMIM data from: {}", data_path);
    let mut pipeline = Pipeline::new(config, resolver, MemorySink::new());
    let summary = pipeline.run_dir(&data_path)?;

    tracing::info!("Data set: {} from {}", summary.data_set, summary.data_source);
    tracing::info!(
        "Morbid map: {} rows, {} linked, {} unresolved, {} without map type",
        summary.map_file.rows,
        summary.map_file.linked_rows,
        summary.map_file.unresolved_rows,
        summary.map_file.unclassified
    );
    for (key, counts) in &summary.map_file.by_map_key {
        tracing::info!(
            "  map type {}: {} / {} resolved ({:.1}%)",
            key,
            counts.resolved,
            counts.total,
            counts.resolution_rate()
        );
    }
    tracing::info!(
        "Titles: {} named, {} synonyms, {} malformed rows",
        summary.titles.named,
        summary.titles.synonyms,
        summary.titles.malformed
    );
    tracing::info!(
        "Citations: {} in {} groups, {} rows for unknown diseases",
        summary.citations.citations,
        summary.citations.groups,
        summary.citations.unknown_disease
    );

    let sink = pipeline.finish()?;
    let with_genes = sink.diseases.iter().filter(|d| d.has_genes()).count();
    tracing::info!(
        "Stored {} diseases ({} with genes), {} genes, {} publications",
        sink.diseases.len(),
        with_genes,
        sink.genes.len(),
        sink.publications.len()
    );

    Ok(())
}
