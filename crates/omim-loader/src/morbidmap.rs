//! Morbid map linking.
//!
//! Each morbid map row pairs an annotated disorder label with a list of gene
//! symbols. The label carries the disorder's MIM number and, at its end, a
//! parenthesised map key:
//!
//! ```text
//! Aarskog-Scott syndrome, 305400 (3)\tFGD1, AAS, FGDY, ZFYVE3\t300546\tXp11.22
//! ```
//!
//! Rows that yield both a MIM number and a resolvable gene link the gene to
//! the disease. Everything else is written, pipe-joined, to a diagnostics
//! writer for manual follow-up.

use std::collections::HashSet;
use std::io::Write;
use std::sync::OnceLock;

use csv::StringRecord;
use omim_types::{MapKey, MimNumber};
use regex::Regex;
use tracing::{debug, info};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::cache::PipelineContext;
use crate::parser::{line_of, pipe_joined};
use crate::resolver::GeneResolver;
use crate::sink::EntitySink;
use crate::types::{MapFileStats, OmimResult};

fn trailing_map_key() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\((.)\)$").expect("valid map key pattern"))
}

fn leading_map_key() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\((.)\)").expect("valid map key pattern"))
}

fn mim_number_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]{6}").expect("valid MIM number pattern"))
}

/// Annotations extracted from one morbid map row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapEntry {
    /// Map key from the label, if present.
    pub map_key: Option<MapKey>,
    /// First symbol of the gene column, trimmed. The rest are synonyms.
    pub symbol: Option<String>,
    /// The last six-digit run in the label.
    pub mim_number: Option<MimNumber>,
    /// How many six-digit runs the label contained.
    pub mim_matches: usize,
}

impl MapEntry {
    /// Extracts the annotations from a row.
    ///
    /// The map key is read from the end of the label; a label with no
    /// trailing key but a leading one, such as `(3) some text 100050`,
    /// uses the leading key. When the label holds several six-digit runs
    /// the last one is the disease, earlier ones are cross-references.
    pub fn from_record(record: &StringRecord) -> Self {
        let label = record.get(0).unwrap_or("").trim();

        let map_key = trailing_map_key()
            .captures(label)
            .or_else(|| leading_map_key().captures(label))
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().chars().next())
            .map(MapKey::from_char);

        let mut mim_number = None;
        let mut mim_matches = 0;
        for m in mim_number_run().find_iter(label) {
            mim_matches += 1;
            mim_number = Some(m.as_str().to_string());
        }

        let symbol = record
            .get(1)
            .and_then(|field| field.split(',').next())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Self {
            map_key,
            symbol,
            mim_number,
            mim_matches,
        }
    }
}

/// Links morbid map rows into the entity cache.
///
/// # Example
///
/// ```
/// use omim_loader::{GeneResolver, MapFileLinker, MemorySink, OmimConfig, PipelineContext, TabularReader};
///
/// let data = "Aarskog-Scott syndrome, 305400 (3)\tFGD1, AAS\t300546\tXp11.22\n";
/// let mut context = PipelineContext::from_config(&OmimConfig::default(), MemorySink::new());
/// let mut resolver = GeneResolver::passthrough("9606");
/// let mut diagnostics = Vec::new();
///
/// let stats = MapFileLinker::new(&mut resolver, &mut diagnostics)
///     .link(&mut context, TabularReader::from_reader(data.as_bytes()))
///     .unwrap();
///
/// assert_eq!(stats.linked_rows, 1);
/// assert_eq!(context.cache.get_disease("305400").unwrap().genes, vec!["FGD1"]);
/// ```
pub struct MapFileLinker<'a, W: Write + ?Sized> {
    resolver: &'a mut GeneResolver,
    diagnostics: &'a mut W,
    stats: MapFileStats,
    linked_diseases: HashSet<MimNumber>,
}

impl<'a, W: Write + ?Sized> MapFileLinker<'a, W> {
    /// Creates a linker that resolves symbols with `resolver` and writes
    /// unlinkable rows to `diagnostics`.
    pub fn new(resolver: &'a mut GeneResolver, diagnostics: &'a mut W) -> Self {
        Self {
            resolver,
            diagnostics,
            stats: MapFileStats::default(),
            linked_diseases: HashSet::new(),
        }
    }

    /// Links every row, in order.
    ///
    /// # Errors
    /// Stops at the first read, storage or diagnostics write error.
    pub fn link<S, I>(mut self, context: &mut PipelineContext<S>, rows: I) -> OmimResult<MapFileStats>
    where
        S: EntitySink,
        I: IntoIterator<Item = OmimResult<StringRecord>>,
    {
        for row in rows {
            let record = row?;
            let entry = MapEntry::from_record(&record);
            self.link_entry(context, &record, entry)?;
        }
        self.finish()
    }

    /// Reads every row, extracts annotations in parallel, then links the
    /// rows in their original order. Produces the same result as [`link`](Self::link).
    ///
    /// # Errors
    /// Stops at the first read, storage or diagnostics write error.
    #[cfg(feature = "parallel")]
    pub fn link_parallel<S, I>(
        mut self,
        context: &mut PipelineContext<S>,
        rows: I,
    ) -> OmimResult<MapFileStats>
    where
        S: EntitySink,
        I: IntoIterator<Item = OmimResult<StringRecord>>,
    {
        let records = rows.into_iter().collect::<OmimResult<Vec<_>>>()?;
        let entries: Vec<MapEntry> = records.par_iter().map(MapEntry::from_record).collect();

        for (record, entry) in records.iter().zip(entries) {
            self.link_entry(context, record, entry)?;
        }
        self.finish()
    }

    fn link_entry<S: EntitySink>(
        &mut self,
        context: &mut PipelineContext<S>,
        record: &StringRecord,
        entry: MapEntry,
    ) -> OmimResult<()> {
        self.stats.rows += 1;
        self.stats.disease_matches += entry.mim_matches;

        match entry.map_key {
            Some(key) => self.stats.by_map_key.entry(key).or_default().total += 1,
            None => self.stats.unclassified += 1,
        }

        // A resolved gene is stored even when the row cannot be linked.
        let gene_id = match entry
            .symbol
            .as_deref()
            .and_then(|symbol| self.resolver.resolve(symbol))
        {
            Some(gene_id) => {
                self.stats.genes_resolved += 1;
                let gene = context.cache.get_or_create_gene(&gene_id, &mut context.sink)?;
                Some(gene.primary_identifier.clone())
            }
            None => None,
        };

        match (entry.mim_number, gene_id) {
            (Some(mim_number), Some(gene_id)) => {
                context.cache.get_or_create_disease(&mim_number).add_gene(gene_id);

                self.stats.linked_rows += 1;
                if let Some(key) = entry.map_key {
                    self.stats.by_map_key.entry(key).or_default().resolved += 1;
                }
                self.linked_diseases.insert(mim_number);
            }
            (mim_number, _) => {
                debug!(
                    line = line_of(record),
                    mim_number = mim_number.as_deref().unwrap_or("-"),
                    symbol = entry.symbol.as_deref().unwrap_or("-"),
                    "morbid map row not linked"
                );
                writeln!(self.diagnostics, "{}", pipe_joined(record))?;
                self.stats.unresolved_rows += 1;
            }
        }

        Ok(())
    }

    fn finish(mut self) -> OmimResult<MapFileStats> {
        self.diagnostics.flush()?;
        self.stats.unique_diseases = self.linked_diseases.len();

        let stats = self.stats;
        info!(
            "Resolved {} of {} gene symbols from file.",
            stats.genes_resolved, stats.rows
        );
        info!(
            "Counts of resolved genes / total for each map type: {} (no map type: {})",
            stats.map_key_summary(),
            stats.unclassified
        );
        info!(
            "Found {} to {} unique diseases from {} line file.",
            stats.disease_matches, stats.unique_diseases, stats.rows
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::tests::{make_record, rows};
    use crate::resolver::SymbolTable;
    use crate::sink::MemorySink;
    use crate::types::OmimConfig;

    fn context() -> PipelineContext<MemorySink> {
        PipelineContext::from_config(&OmimConfig::default(), MemorySink::new())
    }

    fn resolver() -> GeneResolver {
        let mut table = SymbolTable::new("9606");
        table.insert("1", "ABC", &["ABC1"]);
        table.insert("2", "DUP", &[]);
        table.insert("3", "DUP", &[]);
        GeneResolver::new(Some(Box::new(table)), "9606")
    }

    #[test]
    fn test_entry_trailing_map_key() {
        let entry = MapEntry::from_record(&make_record(&[
            "Aarskog-Scott syndrome, 305400 (3)",
            "FGD1, AAS, FGDY",
            "300546",
        ]));
        assert_eq!(entry.map_key, Some(MapKey::MolecularBasis));
        assert_eq!(entry.symbol.as_deref(), Some("FGD1"));
        assert_eq!(entry.mim_number.as_deref(), Some("305400"));
        assert_eq!(entry.mim_matches, 1);
    }

    #[test]
    fn test_entry_leading_map_key() {
        let entry = MapEntry::from_record(&make_record(&["(3) some text 100050", "ABC,XYZ"]));
        assert_eq!(entry.map_key, Some(MapKey::MolecularBasis));
        assert_eq!(entry.symbol.as_deref(), Some("ABC"));
        assert_eq!(entry.mim_number.as_deref(), Some("100050"));
    }

    #[test]
    fn test_entry_last_mim_number_wins() {
        let entry = MapEntry::from_record(&make_record(&["xx 123456 yy 654321", "ABC"]));
        assert_eq!(entry.mim_number.as_deref(), Some("654321"));
        assert_eq!(entry.mim_matches, 2);
        assert_eq!(entry.map_key, None);
    }

    #[test]
    fn test_entry_missing_columns() {
        let entry = MapEntry::from_record(&make_record(&["No number here"]));
        assert_eq!(entry.symbol, None);
        assert_eq!(entry.mim_number, None);
        assert_eq!(entry.mim_matches, 0);

        let entry = MapEntry::from_record(&make_record(&["x 100050", " , ABC"]));
        assert_eq!(entry.symbol, None);
    }

    #[test]
    fn test_links_gene_and_counts_map_key() {
        let mut context = context();
        let mut resolver = resolver();
        let mut diagnostics = Vec::new();

        let stats = MapFileLinker::new(&mut resolver, &mut diagnostics)
            .link(&mut context, rows(&[&["(3) some text 100050", "ABC,XYZ"]]))
            .unwrap();

        let disease = context.cache.get_disease("100050").unwrap();
        assert_eq!(disease.genes, vec!["1"]);
        assert_eq!(
            stats.by_map_key[&MapKey::MolecularBasis],
            crate::types::MapKeyCounts {
                resolved: 1,
                total: 1
            }
        );
        assert!(diagnostics.is_empty());
        assert_eq!(context.sink.genes.len(), 1);
    }

    #[test]
    fn test_last_mim_number_is_linked() {
        let mut context = context();
        let mut resolver = resolver();
        let mut diagnostics = Vec::new();

        MapFileLinker::new(&mut resolver, &mut diagnostics)
            .link(&mut context, rows(&[&["xx 123456 yy 654321", "ABC"]]))
            .unwrap();

        assert!(context.cache.has_disease("654321"));
        assert!(!context.cache.has_disease("123456"));
    }

    #[test]
    fn test_entry_seven_digit_run_yields_first_six() {
        let entry = MapEntry::from_record(&make_record(&["Disorder, 1234567 (3)", "ABC"]));
        assert_eq!(entry.mim_number.as_deref(), Some("123456"));
        assert_eq!(entry.mim_matches, 1);
    }

    #[test]
    fn test_resolved_gene_stored_without_disease() {
        let mut context = context();
        let mut resolver = resolver();
        let mut diagnostics = Vec::new();

        let stats = MapFileLinker::new(&mut resolver, &mut diagnostics)
            .link(&mut context, rows(&[&["No number here (3)", "ABC"]]))
            .unwrap();

        assert_eq!(stats.genes_resolved, 1);
        assert_eq!(stats.linked_rows, 0);
        assert_eq!(stats.unresolved_rows, 1);
        assert!(context.cache.get_gene("1").is_some());
        assert_eq!(context.sink.genes.len(), 1);
        assert_eq!(context.cache.disease_count(), 0);
        assert_eq!(String::from_utf8(diagnostics).unwrap(), "No number here (3)|ABC\n");
    }

    #[test]
    fn test_symbols_for_same_gene_collapse() {
        let mut context = context();
        let mut resolver = resolver();
        let mut diagnostics = Vec::new();

        let stats = MapFileLinker::new(&mut resolver, &mut diagnostics)
            .link(
                &mut context,
                rows(&[
                    &["Disorder A, 100050 (3)", "ABC"],
                    &["Disorder B, 100060 (3)", "ABC1"],
                    &["Disorder A, 100050 (1)", "ABC"],
                ]),
            )
            .unwrap();

        assert_eq!(context.cache.gene_count(), 1);
        assert_eq!(context.sink.genes.len(), 1);
        assert_eq!(context.cache.get_disease("100050").unwrap().genes, vec!["1", "1"]);
        assert_eq!(context.cache.get_disease("100060").unwrap().genes, vec!["1"]);
        assert_eq!(stats.unique_diseases, 2);
        assert_eq!(stats.linked_rows, 3);
    }

    #[test]
    fn test_unresolved_rows_go_to_diagnostics() {
        let mut context = context();
        let mut resolver = resolver();
        let mut diagnostics = Vec::new();

        let stats = MapFileLinker::new(&mut resolver, &mut diagnostics)
            .link(
                &mut context,
                rows(&[
                    &["Ambiguous, 100050 (3)", "DUP, OTHER", "1p36"],
                    &["Unknown, 100060 (2)", "NOPE"],
                    &["No disease number (3)", "ABC"],
                    &["Unclassified 100070", "ABC"],
                ]),
            )
            .unwrap();

        let written = String::from_utf8(diagnostics).unwrap();
        assert_eq!(
            written,
            "Ambiguous, 100050 (3)|DUP, OTHER|1p36\n\
             Unknown, 100060 (2)|NOPE\n\
             No disease number (3)|ABC\n"
        );

        assert_eq!(context.cache.disease_count(), 1);
        assert!(context.cache.has_disease("100070"));
        assert_eq!(context.cache.gene_count(), 1);

        assert_eq!(stats.rows, 4);
        assert_eq!(stats.unresolved_rows, 3);
        assert_eq!(stats.unclassified, 1);
        assert_eq!(stats.genes_resolved, 2);
        assert_eq!(stats.disease_matches, 3);
        assert_eq!(stats.by_map_key[&MapKey::MolecularBasis].total, 2);
        assert_eq!(stats.by_map_key[&MapKey::MolecularBasis].resolved, 0);
        assert_eq!(stats.by_map_key[&MapKey::Linkage].total, 1);
        assert_eq!(resolver.failures().len(), 2);
    }

    #[test]
    fn test_read_error_is_fatal() {
        let mut context = context();
        let mut resolver = resolver();
        let mut diagnostics = Vec::new();

        let input = vec![
            Ok(make_record(&["Disorder, 100050 (3)", "ABC"])),
            Err(crate::types::OmimError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "truncated",
            ))),
        ];
        let result = MapFileLinker::new(&mut resolver, &mut diagnostics).link(&mut context, input);
        assert!(result.is_err());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let input: &[&[&str]] = &[
            &["Disorder A, 100050 (3)", "ABC"],
            &["Disorder B, 100060 (2)", "DUP"],
            &["xx 123456 yy 654321 (1)", "ABC1"],
        ];

        let mut sequential = context();
        let mut resolver_a = resolver();
        let mut diagnostics_a = Vec::new();
        let stats_a = MapFileLinker::new(&mut resolver_a, &mut diagnostics_a)
            .link(&mut sequential, rows(input))
            .unwrap();

        let mut parallel = context();
        let mut resolver_b = resolver();
        let mut diagnostics_b = Vec::new();
        let stats_b = MapFileLinker::new(&mut resolver_b, &mut diagnostics_b)
            .link_parallel(&mut parallel, rows(input))
            .unwrap();

        assert_eq!(stats_a.linked_rows, stats_b.linked_rows);
        assert_eq!(stats_a.by_map_key, stats_b.by_map_key);
        assert_eq!(diagnostics_a, diagnostics_b);
        assert_eq!(
            sequential.cache.get_disease("654321"),
            parallel.cache.get_disease("654321")
        );
    }
}
