//! Record encoder and listing writer

use crate::record::Record;
use std::io::{BufWriter, Write};

/// Encode a record as `Name: value` lines
///
/// Lines are joined with `\n` in field order with no trailing newline. An
/// empty record encodes to an empty string. Names and values are written
/// verbatim.
///
/// # Examples
///
/// ```
/// use cran_description::{encode, Record};
///
/// let record: Record = [("Package", "A3"), ("Version", "1.0.0")].into_iter().collect();
/// assert_eq!(encode(&record), "Package: A3\nVersion: 1.0.0");
/// ```
pub fn encode(record: &Record) -> String {
    record.to_string()
}

/// Encode several records as a `PACKAGES` style listing
///
/// Records are separated by a blank line, which the parser skips.
pub fn encode_listing<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .filter(|record| !record.is_empty())
        .map(encode)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Buffered writer for records and listings
pub struct RecordWriter<W: Write> {
    writer: BufWriter<W>,
    written: usize,
}

impl<W: Write> RecordWriter<W> {
    /// Create a new writer
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            written: 0,
        }
    }

    /// Write one record followed by a newline
    ///
    /// Records after the first are preceded by a blank line.
    pub fn write_record(&mut self, record: &Record) -> Result<(), std::io::Error> {
        if record.is_empty() {
            return Ok(());
        }
        if self.written > 0 {
            writeln!(self.writer)?;
        }
        writeln!(self.writer, "{record}")?;
        self.written += 1;
        Ok(())
    }

    /// Write every record as a listing and flush
    pub fn write_listing<'a, I>(&mut self, records: I) -> Result<(), std::io::Error>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        for record in records {
            self.write_record(record)?;
        }
        self.writer.flush()
    }

    /// Number of records written so far
    pub fn records_written(&self) -> usize {
        self.written
    }

    /// Flush and get the inner writer
    pub fn into_inner(self) -> Result<W, std::io::Error> {
        self.writer
            .into_inner()
            .map_err(std::io::IntoInnerError::into_error)
    }
}

/// Write a listing to a file
pub fn write_to_file<'a, P, I>(path: P, records: I) -> Result<(), std::io::Error>
where
    P: AsRef<std::path::Path>,
    I: IntoIterator<Item = &'a Record>,
{
    let file = std::fs::File::create(path)?;
    let mut writer = RecordWriter::new(file);
    writer.write_listing(records)?;
    Ok(())
}
