//! Physical line splitting
//!
//! Metadata files in the wild use Unix, Windows and classic Mac line endings,
//! sometimes mixed within one file. A physical line ends at any of:
//!
//! | Break | Name |
//! |---|---|
//! | `\n` | line feed |
//! | `\r\n` | carriage return + line feed (one break) |
//! | `\r` | carriage return |
//! | `\x0b`, `\x0c` | line tabulation, form feed |
//! | `\x1c`, `\x1d`, `\x1e` | file, group and record separators |
//! | `\u{85}` | next line |
//! | `\u{2028}`, `\u{2029}` | line and paragraph separators |
//!
//! A break at the very end of the input does not start another line.

use std::io::{BufRead, ErrorKind};

/// Check whether a character ends a physical line
pub fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Single-byte breaks
fn is_ascii_break(byte: u8) -> bool {
    matches!(byte, b'\n' | b'\r' | 0x0b | 0x0c | 0x1c..=0x1e)
}

/// UTF-8 encodings of the multi-byte breaks
const MULTIBYTE_BREAKS: [&[u8]; 3] = [b"\xc2\x85", b"\xe2\x80\xa8", b"\xe2\x80\xa9"];

/// Iterator over the physical lines of a string, without their breaks
///
/// Created by [`physical_lines`].
#[derive(Debug, Clone)]
pub struct PhysicalLines<'a> {
    rest: &'a str,
}

impl<'a> Iterator for PhysicalLines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }

        let Some((end, c)) = self.rest.char_indices().find(|&(_, c)| is_line_break(c)) else {
            let line = self.rest;
            self.rest = "";
            return Some(line);
        };

        let line = &self.rest[..end];
        let mut next = end + c.len_utf8();
        if c == '\r' && self.rest[next..].starts_with('\n') {
            next += 1;
        }
        self.rest = &self.rest[next..];
        Some(line)
    }
}

impl std::iter::FusedIterator for PhysicalLines<'_> {}

/// Split text into physical lines
///
/// # Examples
///
/// ```
/// use cran_description::lines::physical_lines;
///
/// let lines: Vec<&str> = physical_lines("Package: a\rVersion: 1\r\nLicense: MIT\n").collect();
/// assert_eq!(lines, ["Package: a", "Version: 1", "License: MIT"]);
/// ```
pub fn physical_lines(text: &str) -> PhysicalLines<'_> {
    PhysicalLines { rest: text }
}

/// Read one physical line from `reader` into `buf`, without its break
///
/// `buf` is cleared first. Returns the number of bytes consumed from the
/// reader, break included; zero means end of input. Bytes are not checked
/// for UTF-8 here.
pub fn read_physical_line<R: BufRead + ?Sized>(
    reader: &mut R,
    buf: &mut Vec<u8>,
) -> std::io::Result<usize> {
    buf.clear();
    let mut consumed = 0;

    loop {
        let (used, ended_with_cr, ended) = {
            let available = match reader.fill_buf() {
                Ok(available) => available,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if available.is_empty() {
                return Ok(consumed);
            }

            let mut used = 0;
            let mut ended_with_cr = false;
            let mut ended = false;
            for &byte in available {
                used += 1;
                if is_ascii_break(byte) {
                    ended_with_cr = byte == b'\r';
                    ended = true;
                    break;
                }
                buf.push(byte);
                if let Some(sep) = MULTIBYTE_BREAKS.iter().find(|sep| buf.ends_with(sep)) {
                    buf.truncate(buf.len() - sep.len());
                    ended = true;
                    break;
                }
            }
            (used, ended_with_cr, ended)
        };

        reader.consume(used);
        consumed += used;

        if ended {
            if ended_with_cr && next_byte_is_newline(reader)? {
                reader.consume(1);
                consumed += 1;
            }
            return Ok(consumed);
        }
    }
}

fn next_byte_is_newline<R: BufRead + ?Sized>(reader: &mut R) -> std::io::Result<bool> {
    loop {
        match reader.fill_buf() {
            Ok(available) => return Ok(available.first() == Some(&b'\n')),
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
}
