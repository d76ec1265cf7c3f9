//! Error types for CRAN metadata parsing and archive access

use std::path::PathBuf;
use thiserror::Error;

/// Result type for CRAN metadata operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading CRAN metadata
///
/// Structurally odd text is never an error: malformed field lines degrade
/// into continuation lines. Only undecodable input and archive access fail.
#[derive(Error, Debug)]
pub enum Error {
    /// Byte input is not valid UTF-8
    #[error("Metadata is not valid UTF-8: {0}")]
    Decode(#[from] std::str::Utf8Error),

    /// A streamed line is not valid UTF-8
    #[error("Line {line} is not valid UTF-8")]
    InvalidUtf8 {
        /// 1-based line number
        line: usize,
    },

    /// IO error while reading a file or stream
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The archive path does not exist
    #[error("Archive not found: {}", .path.display())]
    ArchiveNotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// The file exists but is not a (gzip-compressed) tar archive
    #[error("File {} is not a tar archive: {reason}", .path.display())]
    NotArchive {
        /// Offending file
        path: PathBuf,
        /// Why the tar reader rejected it
        reason: String,
    },

    /// The archive contains no matching DESCRIPTION member
    #[error("DESCRIPTION file not found in {}", .path.display())]
    DescriptionNotFound {
        /// Archive that was searched
        path: PathBuf,
    },

    /// The matching member is larger than the configured limit
    #[error("DESCRIPTION in {} is {size} bytes, limit is {limit}", .path.display())]
    MemberTooLarge {
        /// Archive holding the member
        path: PathBuf,
        /// Member size in bytes
        size: u64,
        /// Configured limit in bytes
        limit: u64,
    },
}

impl Error {
    /// Whether this error came from decoding text rather than from archive access
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::InvalidUtf8 { .. })
    }
}
