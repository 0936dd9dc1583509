//! Titles file loading.
//!
//! Parses `mimTitles.txt`:
//!
//! ```text
//! # Prefix\tMIM Number\tPreferred Title; symbol\tAlternative Title(s); symbol(s)
//! Number Sign\t100070\tAORTIC ANEURYSM, FAMILIAL ABDOMINAL, 1; AAA1\t...
//! ```
//!
//! The third column is a `;`-separated list: the first entry names the
//! disease and the rest become its synonyms.

use csv::StringRecord;
use omim_types::is_mim_number;
use tracing::{info, warn};

use crate::cache::PipelineContext;
use crate::parser::line_of;
use crate::sink::EntitySink;
use crate::types::{OmimError, OmimResult, TitleStats};

/// Minimum number of columns in a titles row.
const TITLE_COLUMNS: usize = 3;

/// A parsed titles row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleRow {
    /// MIM number from column 1.
    pub mim_number: String,
    /// Names from column 2, trimmed, blanks removed.
    pub names: Vec<String>,
}

impl TitleRow {
    /// Parses a row that is not a header.
    ///
    /// # Errors
    /// Returns [`OmimError::MalformedRow`] if the row has fewer than three
    /// columns and [`OmimError::InvalidMimNumber`] if column 1 is not six digits.
    pub fn from_record(record: &StringRecord) -> OmimResult<Self> {
        if record.len() < TITLE_COLUMNS {
            return Err(OmimError::MalformedRow {
                file: "titles",
                line: line_of(record),
                expected: TITLE_COLUMNS,
                found: record.len(),
            });
        }

        let mim_number = record[1].trim();
        if !is_mim_number(mim_number) {
            return Err(OmimError::InvalidMimNumber {
                file: "titles",
                line: line_of(record),
                value: mim_number.to_string(),
            });
        }

        let names = record[2]
            .split(';')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            mim_number: mim_number.to_string(),
            names,
        })
    }
}

/// Returns true if a row is a header row.
fn is_header(record: &StringRecord) -> bool {
    record.get(0).is_some_and(|prefix| prefix.starts_with('#'))
}

/// Loads disease names from titles rows.
///
/// Diseases not yet in the cache are created; a disease known only from
/// this file has a name and no genes.
///
/// # Errors
/// Stops at the first read error. Malformed rows are logged and skipped.
pub fn load_titles<S, I>(context: &mut PipelineContext<S>, rows: I) -> OmimResult<TitleStats>
where
    S: EntitySink,
    I: IntoIterator<Item = OmimResult<StringRecord>>,
{
    let mut stats = TitleStats::default();

    for row in rows {
        let record = row?;
        stats.rows += 1;

        if is_header(&record) {
            stats.headers += 1;
            continue;
        }

        let title = match TitleRow::from_record(&record) {
            Ok(title) => title,
            Err(e) => {
                warn!("Disease not processed -- {}", e);
                stats.malformed += 1;
                continue;
            }
        };

        let disease = context.cache.get_or_create_disease(&title.mim_number);
        let mut names = title.names.into_iter();
        if let Some(name) = names.next() {
            disease.set_name(name);
            stats.named += 1;
        }
        for synonym in names {
            if disease.add_synonym(synonym) {
                stats.synonyms += 1;
            }
        }
    }

    info!(
        "Loaded titles: {} rows, {} named, {} synonyms, {} malformed",
        stats.rows, stats.named, stats.synonyms, stats.malformed
    );
    Ok(stats)
}
