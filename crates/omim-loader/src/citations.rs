//! PubMed citation linking.
//!
//! Parses `pubmed_cited`, three columns per row: MIM number, position of
//! the citation within that entry's reference list, PubMed id.
//!
//! ```text
//! 100050\t1\t4296108
//! 100050\t2\t5413939
//! 100070\t1\t2011237
//! ```
//!
//! Rows are grouped by MIM number and each group restarts at position 1.
//! A group replaces the publication list of a disease already in the
//! cache. Rows for any other MIM number are skipped; this file
//! never creates diseases.

use csv::StringRecord;
use omim_types::{is_mim_number, MimNumber, PubMedId};
use tracing::{debug, info};

use crate::cache::PipelineContext;
use crate::parser::line_of;
use crate::sink::EntitySink;
use crate::types::{CitationStats, OmimError, OmimResult};

/// Exact number of columns in a citation row.
const CITATION_COLUMNS: usize = 3;

/// Position that opens a new citation group.
const GROUP_START: &str = "1";

/// A parsed citation row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationRow {
    /// MIM number of the citing entry.
    pub mim_number: MimNumber,
    /// 1-based position within the entry's citations.
    pub position: String,
    /// PubMed id of the cited publication.
    pub pubmed_id: PubMedId,
}

impl CitationRow {
    /// Parses a citation row.
    ///
    /// # Errors
    /// Returns [`OmimError::MalformedRow`] unless the row has exactly three
    /// columns and [`OmimError::InvalidMimNumber`] if column 0 is not six digits.
    pub fn from_record(record: &StringRecord) -> OmimResult<Self> {
        if record.len() != CITATION_COLUMNS {
            return Err(OmimError::MalformedRow {
                file: "pubmed_cited",
                line: line_of(record),
                expected: CITATION_COLUMNS,
                found: record.len(),
            });
        }

        let mim_number = record[0].trim();
        if !is_mim_number(mim_number) {
            return Err(OmimError::InvalidMimNumber {
                file: "pubmed_cited",
                line: line_of(record),
                value: mim_number.to_string(),
            });
        }

        Ok(Self {
            mim_number: mim_number.to_string(),
            position: record[1].trim().to_string(),
            pubmed_id: record[2].trim().to_string(),
        })
    }

    /// Returns true if this row opens a citation group.
    pub fn starts_group(&self) -> bool {
        self.position == GROUP_START
    }
}

/// Accumulates one citation group at a time and attaches it to its disease.
///
/// Assumes the file lists each disease's citations contiguously, with the
/// position restarting at 1; this is not checked.
///
/// # Example
///
/// ```
/// use omim_loader::{CitationLinker, MemorySink, OmimConfig, PipelineContext, TabularReader};
///
/// let mut context = PipelineContext::from_config(&OmimConfig::default(), MemorySink::new());
/// context.cache.get_or_create_disease("100070");
///
/// let data = "100070\t1\t111\n100070\t2\t222\n999999\t1\t333\n";
/// CitationLinker::new()
///     .link(&mut context, TabularReader::from_reader(data.as_bytes()))
///     .unwrap();
///
/// assert_eq!(context.cache.get_disease("100070").unwrap().publications, vec!["111", "222"]);
/// assert!(!context.cache.has_disease("999999"));
/// ```
#[derive(Debug, Default)]
pub struct CitationLinker {
    current: Option<MimNumber>,
    pending: Vec<PubMedId>,
    stats: CitationStats,
}

impl CitationLinker {
    /// Creates a linker with no open group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Links every row, in order, then closes the last group.
    ///
    /// # Errors
    /// Stops at the first read or storage error. Malformed rows and rows
    /// for unknown diseases are skipped.
    pub fn link<S, I>(mut self, context: &mut PipelineContext<S>, rows: I) -> OmimResult<CitationStats>
    where
        S: EntitySink,
        I: IntoIterator<Item = OmimResult<StringRecord>>,
    {
        for row in rows {
            let record = row?;
            self.stats.rows += 1;

            let citation = match CitationRow::from_record(&record) {
                Ok(citation) => citation,
                Err(e) => {
                    debug!("Citation ignored -- {}", e);
                    self.stats.malformed += 1;
                    continue;
                }
            };

            self.add(context, citation)?;
        }

        self.flush(context);

        info!(
            "Linked {} citations in {} groups from {} rows ({} for unknown diseases, {} malformed)",
            self.stats.citations,
            self.stats.groups,
            self.stats.rows,
            self.stats.unknown_disease,
            self.stats.malformed
        );
        Ok(self.stats)
    }

    fn add<S: EntitySink>(
        &mut self,
        context: &mut PipelineContext<S>,
        citation: CitationRow,
    ) -> OmimResult<()> {
        if !context.cache.has_disease(&citation.mim_number) {
            self.stats.unknown_disease += 1;
            return Ok(());
        }

        if citation.starts_group() {
            self.flush(context);
            self.current = Some(citation.mim_number);
        } else if self.current.is_none() {
            self.current = Some(citation.mim_number);
        }

        let publication = context
            .cache
            .get_or_create_publication(&citation.pubmed_id, &mut context.sink)?;
        self.pending.push(publication.pubmed_id.clone());
        Ok(())
    }

    /// Replaces the open group's disease publications with the pending list.
    fn flush<S: EntitySink>(&mut self, context: &mut PipelineContext<S>) {
        let Some(mim_number) = self.current.take() else {
            return;
        };
        let publications = std::mem::take(&mut self.pending);

        if let Some(disease) = context.cache.get_disease_mut(&mim_number) {
            self.stats.groups += 1;
            self.stats.citations += publications.len();
            disease.set_publications(publications);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::tests::{make_record, rows};
    use crate::sink::MemorySink;
    use crate::types::OmimConfig;

    fn context_with(diseases: &[&str]) -> PipelineContext<MemorySink> {
        let mut context = PipelineContext::from_config(&OmimConfig::default(), MemorySink::new());
        for mim_number in diseases {
            context.cache.get_or_create_disease(mim_number);
        }
        context
    }

    #[test]
    fn test_citation_row() {
        let row = CitationRow::from_record(&make_record(&["100050", "1", "4296108"])).unwrap();
        assert!(row.starts_group());
        assert_eq!(row.pubmed_id, "4296108");

        assert!(CitationRow::from_record(&make_record(&["100050", "1"])).is_err());
        assert!(CitationRow::from_record(&make_record(&["100050", "1", "2", "3"])).is_err());
    }

    #[test]
    fn test_groups_attach_to_their_disease() {
        let mut context = context_with(&["100070", "100080"]);
        let stats = CitationLinker::new()
            .link(
                &mut context,
                rows(&[
                    &["100070", "1", "111"],
                    &["100070", "2", "222"],
                    &["100080", "1", "333"],
                ]),
            )
            .unwrap();

        assert_eq!(
            context.cache.get_disease("100070").unwrap().publications,
            vec!["111", "222"]
        );
        assert_eq!(context.cache.get_disease("100080").unwrap().publications, vec!["333"]);
        assert_eq!(stats.groups, 2);
        assert_eq!(stats.citations, 3);
        assert_eq!(context.cache.publication_count(), 3);
        assert_eq!(context.sink.publications.len(), 3);
    }

    #[test]
    fn test_unknown_disease_never_created() {
        let mut context = context_with(&["100070"]);
        let stats = CitationLinker::new()
            .link(
                &mut context,
                rows(&[
                    &["100060", "1", "900"],
                    &["100060", "2", "901"],
                    &["100070", "1", "111"],
                    &["100090", "1", "902"],
                ]),
            )
            .unwrap();

        assert_eq!(context.cache.disease_count(), 1);
        assert!(!context.cache.has_disease("100060"));
        assert!(!context.cache.has_disease("100090"));
        assert_eq!(context.cache.get_disease("100070").unwrap().publications, vec!["111"]);
        assert_eq!(context.cache.publication_count(), 1);
        assert_eq!(stats.unknown_disease, 3);
    }

    #[test]
    fn test_malformed_rows_ignored() {
        let mut context = context_with(&["100070"]);
        let stats = CitationLinker::new()
            .link(
                &mut context,
                rows(&[
                    &["100070", "1"],
                    &["100070", "1", "111"],
                    &["100070", "2", "222", "extra"],
                ]),
            )
            .unwrap();

        assert_eq!(context.cache.get_disease("100070").unwrap().publications, vec!["111"]);
        assert_eq!(stats.malformed, 2);
    }

    #[test]
    fn test_invalid_mim_number_is_malformed() {
        let err = CitationRow::from_record(&make_record(&["MIM", "1", "111"])).unwrap_err();
        assert!(matches!(err, OmimError::InvalidMimNumber { .. }));

        let mut context = context_with(&["100070"]);
        let stats = CitationLinker::new()
            .link(
                &mut context,
                rows(&[&["100070", "1", "111"], &["1000700", "2", "222"]]),
            )
            .unwrap();

        assert_eq!(stats.malformed, 1);
        assert_eq!(stats.unknown_disease, 0);
        assert_eq!(context.cache.get_disease("100070").unwrap().publications, vec!["111"]);
    }

    #[test]
    fn test_replay_replaces_publications() {
        let mut context = context_with(&["100070"]);
        let input: &[&[&str]] = &[&["100070", "1", "111"], &["100070", "2", "222"]];

        CitationLinker::new().link(&mut context, rows(input)).unwrap();
        CitationLinker::new().link(&mut context, rows(input)).unwrap();

        assert_eq!(
            context.cache.get_disease("100070").unwrap().publications,
            vec!["111", "222"]
        );
        assert_eq!(context.cache.publication_count(), 2);
        assert_eq!(context.sink.publications.len(), 2);
    }

    #[test]
    fn test_publications_shared_across_diseases() {
        let mut context = context_with(&["100070", "100080"]);
        CitationLinker::new()
            .link(
                &mut context,
                rows(&[&["100070", "1", "111"], &["100080", "1", "111"]]),
            )
            .unwrap();

        assert_eq!(context.cache.publication_count(), 1);
        assert_eq!(context.cache.get_disease("100080").unwrap().publications, vec!["111"]);
    }
}
