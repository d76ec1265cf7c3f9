#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Integration tests for PACKAGES listings and DESCRIPTION files
//!
//! Fixtures are excerpts of the CRAN `src/contrib/PACKAGES` index and a
//! DESCRIPTION file from a published source package.

use cran_description::{
    Error, Record, RecordReader, RecordWriter, decode, decode_bytes, encode, encode_listing, parse,
    parse_bytes,
};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures")
        .join(name)
}

fn read_fixture(name: &str) -> String {
    let path = fixture(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
}

fn record(fields: &[(&str, &str)]) -> Record {
    fields.iter().copied().collect()
}

#[test]
fn test_parse_packages_fixture() {
    let listing = read_fixture("PACKAGES");
    let records: Vec<Record> = parse(&listing).collect();

    let package_lines = listing
        .lines()
        .filter(|line| line.starts_with("Package:"))
        .count();
    assert_eq!(records.len(), package_lines);
    assert_eq!(records.len(), 8);

    let names: Vec<&str> = records.iter().filter_map(Record::package).collect();
    assert_eq!(
        names,
        vec![
            "A3", "ABACUS", "abbyyR", "abc", "abc.data", "ABC.RAP", "abcdeFBA", "ABCoptim"
        ]
    );

    for record in &records {
        assert_eq!(record.field_names().next(), Some("Package"));
        assert!(record.contains_field("MD5sum"), "{record:?}");
    }
}

#[test]
fn test_packages_fixture_values() {
    let listing = read_fixture("PACKAGES");
    let records: Vec<Record> = parse(&listing).collect();

    assert_eq!(
        records[1],
        record(&[
            ("Package", "ABACUS"),
            ("Version", "1.0.0"),
            ("Depends", "R (>= 3.1.0)"),
            ("Imports", "ggplot2 (>= 3.1.0), shiny (>= 1.3.1),"),
            ("Suggests", "rmarkdown (>= 1.13), knitr (>= 1.22)"),
            ("License", "GPL-3"),
            ("MD5sum", "50c54c4da09307cb95a70aaaa54b9fbd"),
            ("NeedsCompilation", "no"),
        ])
    );

    let abcoptim = records.last().unwrap();
    assert_eq!(abcoptim.get("LinkingTo"), Some("Rcpp"));
    assert_eq!(abcoptim.get("NeedsCompilation"), Some("yes"));
}

#[test]
fn test_listing_without_blank_lines() {
    let listing = "Package: abc
Version: 2.1
Depends: R (>= 2.10), abc.data, nnet, quantreg, MASS, locfit
License: GPL (>= 3)
MD5sum: c9fffe4334c178917f762735aba59653
NeedsCompilation: no
Package: abc.data
Version: 1.0
Depends: R (>= 2.10)
License: GPL (>= 3)
MD5sum: 799079dbbdd0cfc9d9c61c3e35241806
NeedsCompilation: no";

    let records: Vec<Record> = parse(listing).collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].package(), Some("abc"));
    assert_eq!(records[1].package(), Some("abc.data"));
    assert_eq!(records[1].get("Depends"), Some("R (>= 2.10)"));
}

#[test]
fn test_listing_as_bytes() {
    let listing = read_fixture("PACKAGES");
    let from_bytes: Vec<Record> = parse_bytes(listing.as_bytes()).unwrap().collect();
    let from_text: Vec<Record> = parse(&listing).collect();
    assert_eq!(from_bytes, from_text);
}

#[test]
fn test_stream_packages_file() {
    let reader = RecordReader::from_path(fixture("PACKAGES")).unwrap();
    let records: Vec<Record> = reader.collect::<Result<_, Error>>().unwrap();
    assert_eq!(records.len(), 8);
    assert_eq!(records[3].version(), Some("2.1"));
}

#[test]
fn test_stream_missing_file() {
    let result = RecordReader::from_path(fixture("does-not-exist"));
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_decode_description_fixture() {
    let description = read_fixture("DESCRIPTION");
    let record = decode(&description).unwrap();

    assert_eq!(record.package(), Some("abbyyR"));
    assert_eq!(record.version(), Some("0.5.5"));
    assert_eq!(
        record.get("Authors@R"),
        Some(r#"person("Gaurav", "Sood", email = "gsood07@gmail.com", role = c("aut", "cre"))"#)
    );
    assert_eq!(
        record.get("Description"),
        Some(
            "Get text from images of text using Abbyy Cloud Reader <http://ocrsdk.com/>. \
             Abbyy provides OCR for over 60 languages."
        )
    );
    assert_eq!(record.get("URL"), Some("http://github.com/soodoku/abbyyR"));
    assert_eq!(
        record.get("Packaged"),
        Some("2018-05-30 14:17:33 UTC; soodoku")
    );
    assert_eq!(
        record.get("Date/Publication"),
        Some("2018-05-30 16:03:45 UTC")
    );
    assert!(!record.contains_field("<http"));
    assert_eq!(record.len(), 20);

    // A single DESCRIPTION never splits
    assert_eq!(parse(&description).count(), 1);
}

#[test]
fn test_decode_bytes_fixture() {
    let bytes = std::fs::read(fixture("DESCRIPTION")).unwrap();
    let record = decode_bytes(&bytes).unwrap().unwrap();
    assert_eq!(record.get("Repository"), Some("CRAN"));
}

#[test]
fn test_decode_empty() {
    assert_eq!(decode(""), None);
    assert_eq!(decode_bytes(b"  \n \n").unwrap(), None);
}

#[test]
fn test_encode_matches_source_layout() {
    let source = "
    Package: ABACUS
    Version: 1.0.0
    Depends: R (>= 3.1.0)
    Imports: ggplot2 (>= 3.1.0), shiny (>= 1.3.1),
    Suggests: rmarkdown (>= 1.13), knitr (>= 1.22)
    License: GPL-3
    MD5sum: 50c54c4da09307cb95a70aaaa54b9fbd
    NeedsCompilation: no
    ";
    let record = decode(source).unwrap();

    let clean = |text: &str| {
        text.lines()
            .map(str::trim)
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    };
    assert_eq!(encode(&record), clean(source));
}

#[test]
fn test_listing_round_trip() {
    let listing = read_fixture("PACKAGES");
    let records: Vec<Record> = parse(&listing).collect();

    // The fixture has no continuation lines, so it is already canonical
    assert_eq!(encode_listing(&records), listing.trim_end());

    let mut writer = RecordWriter::new(Vec::new());
    writer.write_listing(&records).unwrap();
    let written = String::from_utf8(writer.into_inner().unwrap()).unwrap();
    assert_eq!(written, listing);
}

#[test]
fn test_invalid_utf8_listing() {
    let mut bytes = read_fixture("PACKAGES").into_bytes();
    bytes.extend_from_slice(b"\nPackage: broken\nTitle: \xc3\x28\n");

    assert!(matches!(parse_bytes(&bytes), Err(Error::Decode(_))));

    let results: Vec<Result<Record, Error>> =
        RecordReader::new(std::io::Cursor::new(bytes)).collect();
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 8);
    assert!(matches!(
        results.last(),
        Some(Err(Error::InvalidUtf8 { .. }))
    ));
}
