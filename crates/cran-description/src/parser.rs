//! Line-oriented record parser for CRAN metadata
//!
//! Both `PACKAGES` listings and single `DESCRIPTION` files use the same
//! layout:
//!
//! ```text
//! Package: abc
//! Version: 2.1
//! Depends: R (>= 2.10), abc.data, nnet,
//!     quantreg, MASS, locfit
//! Package: abc.data
//! Version: 1.0
//! ```
//!
//! Lines end at any of the breaks listed in [`crate::lines`], so Unix,
//! Windows and classic Mac files all parse the same way.
//!
//! A line declares a field when the text before its first colon starts with
//! an alphabetic character. Any other non-blank line continues the value of
//! the most recently added field. A field name that the active record
//! already holds starts the next record.

use crate::error::{Error, Result};
use crate::lines::{PhysicalLines, physical_lines, read_physical_line};
use crate::record::Record;
use std::io::{BufRead, BufReader};
use std::iter::FusedIterator;
use std::path::Path;
use tracing::{debug, trace};

/// How a single physical line is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Empty or whitespace-only line, ignored
    Blank,
    /// `Name: value` declaration, both sides trimmed
    Field {
        /// Field name
        name: &'a str,
        /// Field value, later colons included
        value: &'a str,
    },
    /// Text appended to the previous field's value
    Continuation(&'a str),
}

impl<'a> LineKind<'a> {
    /// Classify a line
    ///
    /// Only the first colon splits name from value; later colons (times,
    /// URLs) stay in the value. A colon line whose name is empty or does not
    /// start with an alphabetic character is a continuation as a whole.
    ///
    /// # Examples
    ///
    /// ```
    /// use cran_description::LineKind;
    ///
    /// assert_eq!(
    ///     LineKind::classify("Packaged: 2015-08-16 14:17:33 UTC; scott"),
    ///     LineKind::Field { name: "Packaged", value: "2015-08-16 14:17:33 UTC; scott" },
    /// );
    /// assert_eq!(
    ///     LineKind::classify("    <http://ocrsdk.com/>."),
    ///     LineKind::Continuation("<http://ocrsdk.com/>."),
    /// );
    /// ```
    pub fn classify(line: &'a str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Self::Blank;
        }

        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            if is_field_name(name) {
                return Self::Field {
                    name,
                    value: value.trim(),
                };
            }
        }

        Self::Continuation(trimmed)
    }
}

/// Check whether text before a colon can be a field name
///
/// The name must be non-empty and start with an alphabetic character.
pub fn is_field_name(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_alphabetic)
}

/// Incremental record accumulator
///
/// Feed lines in order with [`push_line`](Self::push_line); a record is
/// returned as soon as the next one begins. Call [`finish`](Self::finish)
/// at end of input to flush the last record.
///
/// Records are split only when a field name repeats within the active
/// record. Blank lines do not separate records, so two neighbouring blocks
/// with no field name in common are merged into one. CRAN listings start
/// every entry with `Package`, which keeps the split reliable in practice.
#[derive(Debug, Default)]
pub struct RecordParser {
    /// Record being accumulated; its keys double as the seen-set
    active: Record,
    /// Records handed out so far
    emitted: usize,
}

impl RecordParser {
    /// Create a parser with an empty active record
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line, returning a record if this line completed one
    pub fn push_line(&mut self, line: &str) -> Option<Record> {
        match LineKind::classify(line) {
            LineKind::Blank => None,
            LineKind::Field { name, value } => {
                if self.active.contains_field(name) {
                    let mut next = Record::new();
                    next.insert(name, value);
                    let done = std::mem::replace(&mut self.active, next);
                    self.emit(done)
                } else {
                    self.active.insert(name, value);
                    None
                }
            }
            LineKind::Continuation(text) => {
                if !self.active.append_continuation(text) {
                    trace!("Dropping continuation line before any field: {text:?}");
                }
                None
            }
        }
    }

    /// Flush the active record, if it has any fields
    pub fn finish(&mut self) -> Option<Record> {
        let last = std::mem::take(&mut self.active);
        self.emit(last)
    }

    /// Number of records returned so far
    pub fn records_emitted(&self) -> usize {
        self.emitted
    }

    fn emit(&mut self, record: Record) -> Option<Record> {
        if record.is_empty() {
            return None;
        }
        self.emitted += 1;
        trace!(
            "Record {} complete: package={:?}, fields={}",
            self.emitted,
            record.package(),
            record.len()
        );
        Some(record)
    }
}

/// Lazy iterator over the records of an in-memory listing
///
/// Created by [`parse`] and [`parse_bytes`].
#[derive(Debug)]
pub struct Records<'a> {
    lines: PhysicalLines<'a>,
    parser: RecordParser,
    finished: bool,
}

impl<'a> Records<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: physical_lines(text),
            parser: RecordParser::new(),
            finished: false,
        }
    }
}

impl Iterator for Records<'_> {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        if self.finished {
            return None;
        }

        for line in self.lines.by_ref() {
            if let Some(record) = self.parser.push_line(line) {
                return Some(record);
            }
        }

        self.finished = true;
        let last = self.parser.finish();
        debug!("Parsed {} records", self.parser.records_emitted());
        last
    }
}

impl FusedIterator for Records<'_> {}

/// Streaming record reader over any [`BufRead`] source
///
/// Holds one line and the active record at a time, so listings of any
/// size can be processed. The first I/O or decoding failure is yielded as
/// an error and ends the iteration; records yielded before it are complete.
///
/// Only a line that is not valid UTF-8 is reported as
/// [`Error::InvalidUtf8`]. Failures of the underlying reader, including
/// `InvalidData` from a decompressor, pass through as [`Error::Io`].
#[derive(Debug)]
pub struct RecordReader<R> {
    reader: R,
    buf: Vec<u8>,
    line: usize,
    parser: RecordParser,
    finished: bool,
}

impl<R: BufRead> RecordReader<R> {
    /// Create a reader
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line: 0,
            parser: RecordParser::new(),
            finished: false,
        }
    }

    /// Get the inner reader
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl RecordReader<BufReader<std::fs::File>> {
    /// Open a listing file, such as a downloaded `PACKAGES`
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            match read_physical_line(&mut self.reader, &mut self.buf) {
                Ok(0) => {
                    self.finished = true;
                    let last = self.parser.finish();
                    debug!("Read {} records from stream", self.parser.records_emitted());
                    return last.map(Ok);
                }
                Ok(_) => {
                    self.line += 1;
                    let Ok(line) = std::str::from_utf8(&self.buf) else {
                        self.finished = true;
                        return Some(Err(Error::InvalidUtf8 { line: self.line }));
                    };
                    if let Some(record) = self.parser.push_line(line) {
                        return Some(Ok(record));
                    }
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e.into()));
                }
            }
        }
    }
}

impl<R: BufRead> FusedIterator for RecordReader<R> {}

/// Parse a listing into a lazy sequence of records
///
/// Empty or whitespace-only text yields nothing.
///
/// # Examples
///
/// ```
/// let listing = "Package: abc\nVersion: 2.1\nPackage: abc.data\nVersion: 1.0";
///
/// let packages: Vec<_> = cran_description::parse(listing).collect();
/// assert_eq!(packages.len(), 2);
/// assert_eq!(packages[1].package(), Some("abc.data"));
/// ```
pub fn parse(text: &str) -> Records<'_> {
    Records::new(text)
}

/// Decode bytes as UTF-8 and parse them into a lazy sequence of records
///
/// Invalid UTF-8 fails before any record is produced.
pub fn parse_bytes(bytes: &[u8]) -> Result<Records<'_>> {
    let text = std::str::from_utf8(bytes)?;
    Ok(Records::new(text))
}

/// Parse only the first record, or `None` when the text holds no fields
///
/// # Examples
///
/// ```
/// let record = cran_description::decode("Package: A3\nVersion: 1.0.0").unwrap();
/// assert_eq!(record.version(), Some("1.0.0"));
///
/// assert!(cran_description::decode("").is_none());
/// ```
pub fn decode(text: &str) -> Option<Record> {
    parse(text).next()
}

/// Decode bytes as UTF-8 and parse only the first record
pub fn decode_bytes(bytes: &[u8]) -> Result<Option<Record>> {
    Ok(parse_bytes(bytes)?.next())
}
