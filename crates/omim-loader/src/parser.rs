//! Tab-delimited record reader.
//!
//! Provides a streaming reader for the OMIM flat-file exports. The reader
//! only splits lines into fields; each linker decides what a row means and
//! what to do with rows of the wrong shape.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ByteRecord, Reader, ReaderBuilder, StringRecord};
use tracing::warn;

use crate::types::{OmimError, OmimResult};

/// A streaming reader over tab-delimited rows.
///
/// Yields one [`StringRecord`] per non-blank line, in file order. Rows may
/// have any number of columns. Bytes that are not valid UTF-8 are replaced
/// with U+FFFD and the row is kept. A read failure on the underlying stream
/// is yielded as an error; callers stop at the first one.
pub struct TabularReader<R: Read> {
    reader: Reader<R>,
    records_read: usize,
    lossy_records: usize,
}

impl TabularReader<BufReader<File>> {
    /// Creates a reader from a file path.
    ///
    /// # Errors
    /// Returns an error if the file does not exist or cannot be opened.
    pub fn from_path<P: AsRef<Path>>(path: P) -> OmimResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(OmimError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let file = File::open(path)?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: Read> TabularReader<R> {
    /// Creates a reader over any byte stream.
    pub fn from_reader(reader: R) -> Self {
        let csv_reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .trim(csv::Trim::None)
            .from_reader(reader);

        Self {
            reader: csv_reader,
            records_read: 0,
            lossy_records: 0,
        }
    }

    /// Returns the number of non-blank rows yielded so far.
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// Returns the number of rows that held invalid UTF-8.
    pub fn lossy_records(&self) -> usize {
        self.lossy_records
    }
}

impl<R: Read> Iterator for TabularReader<R> {
    type Item = OmimResult<StringRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut bytes = ByteRecord::new();
            match self.reader.read_byte_record(&mut bytes) {
                Ok(true) => {
                    let record = self.decode(bytes);
                    // Skip blank lines
                    if record.is_empty() || record.iter().all(|f| f.trim().is_empty()) {
                        continue;
                    }
                    self.records_read += 1;
                    return Some(Ok(record));
                }
                Ok(false) => return None,
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

impl<R: Read> TabularReader<R> {
    fn decode(&mut self, bytes: ByteRecord) -> StringRecord {
        let position = bytes.position().cloned();
        match StringRecord::from_byte_record(bytes) {
            Ok(record) => record,
            Err(e) => {
                self.lossy_records += 1;
                let line = position.as_ref().map(|p| p.line()).unwrap_or(0);
                warn!(line, "row is not valid UTF-8, replacing invalid bytes");

                let mut record = StringRecord::from_byte_record_lossy(e.into_byte_record());
                record.set_position(position);
                record
            }
        }
    }
}

/// Returns the 1-based line a record started on, or 0 if unknown.
pub fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

/// Joins all fields of a record with `|`.
pub fn pipe_joined(record: &StringRecord) -> String {
    record.iter().collect::<Vec<_>>().join("|")
}
