//! Parse a CRAN `PACKAGES` listing
//!
//! Reads the file named on the command line, or the bundled fixture when no
//! argument is given, and prints a short summary of every package.
//!
//! ```text
//! RUST_LOG=cran_description=debug cargo run --example parse_listing -- PACKAGES
//! ```

use cran_description::{Error, RecordReader, encode, record::fields};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let path = std::env::args_os().nth(1).map_or_else(
        || PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_fixtures/PACKAGES"),
        PathBuf::from,
    );

    println!("=== Parsing {} ===\n", path.display());

    let mut last = None;
    let mut count = 0;
    for record in RecordReader::from_path(&path)? {
        let record = record?;
        count += 1;

        println!(
            "{:<12} {:<10} {}",
            record.package().unwrap_or("?"),
            record.version().unwrap_or("?"),
            record.get(fields::LICENSE).unwrap_or("-"),
        );
        if let Some(depends) = record.get(fields::DEPENDS) {
            println!("    Depends: {depends}");
        }
        last = Some(record);
    }

    println!("\n{count} packages");

    if let Some(record) = last {
        println!("\nLast record, re-encoded:\n{}", encode(&record));
    }

    Ok(())
}
