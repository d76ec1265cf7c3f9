//! # cran-description
//!
//! Parser and writer for CRAN package metadata: the multi-package `PACKAGES`
//! index served by CRAN mirrors, and the `DESCRIPTION` file shipped inside
//! every R source package.
//!
//! Both use the same flat `Name: value` layout. Values may wrap onto
//! indented continuation lines, and a repeated field name marks the start of
//! the next package.
//!
//! ## Format Structure
//!
//! ```text
//! Package: abc
//! Version: 2.1
//! Depends: R (>= 2.10), abc.data, nnet, quantreg,
//!     MASS, locfit
//! License: GPL (>= 3)
//! Package: abc.data
//! Version: 1.0
//! ```
//!
//! Dependency strings such as `R (>= 2.10)` are kept as opaque text.
//!
//! ## Quick Start
//!
//! ### Parsing a listing
//!
//! ```rust
//! let listing = "Package: abc\nVersion: 2.1\n\nPackage: abc.data\nVersion: 1.0\n";
//!
//! for record in cran_description::parse(listing) {
//!     println!("{} {}", record.package().unwrap_or("?"), record.version().unwrap_or("?"));
//! }
//! ```
//!
//! ### Decoding and encoding a single record
//!
//! ```rust
//! use cran_description::{decode, encode};
//!
//! let record = decode("Package: A3\nVersion: 1.0.0\nSuggests: randomForest,\n    e1071")
//!     .expect("record present");
//! assert_eq!(record.get("Suggests"), Some("randomForest, e1071"));
//!
//! assert_eq!(
//!     encode(&record),
//!     "Package: A3\nVersion: 1.0.0\nSuggests: randomForest, e1071"
//! );
//! ```
//!
//! ### Reading a source package
//!
//! ```rust,no_run
//! let record = cran_description::from_file("abc_2.1.tar.gz")?;
//! # Ok::<(), cran_description::Error>(())
//! ```

#![warn(missing_docs)]

pub mod archive;
pub mod encoder;
pub mod error;
pub mod lines;
pub mod parser;
pub mod record;

pub use archive::{
    ArchiveConfig, DescriptionSource, MemberMatch, TarballSource, from_archive_reader, from_file,
    from_source,
};
pub use encoder::{RecordWriter, encode, encode_listing, write_to_file};
pub use error::{Error, Result};
pub use lines::{PhysicalLines, physical_lines};
pub use parser::{
    LineKind, RecordParser, RecordReader, Records, decode, decode_bytes, parse, parse_bytes,
};
pub use record::Record;

#[cfg(doctest)]
#[doc = include_str!("../README.md")]
pub struct ReadmeDoctests;
