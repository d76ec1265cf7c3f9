//! Read DESCRIPTION from an R source package
//!
//! ```text
//! cargo run --example read_tarball -- abc_2.1.tar.gz
//! ```
//!
//! Pass `--root` to accept only the top-level `<package>/DESCRIPTION` member.

use cran_description::{ArchiveConfig, Error, MemberMatch, TarballSource, from_source};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut root_only = false;
    let mut paths = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "--root" {
            root_only = true;
        } else {
            paths.push(arg);
        }
    }

    if paths.is_empty() {
        eprintln!("usage: read_tarball [--root] <package_version.tar.gz>...");
        return ExitCode::FAILURE;
    }

    let mut config = ArchiveConfig::new();
    if root_only {
        config = config.with_member_match(MemberMatch::PackageRoot);
    }
    let source = TarballSource::new(config);

    let mut status = ExitCode::SUCCESS;
    for path in &paths {
        match from_source(&source, path) {
            Ok(Some(record)) => {
                println!("== {path}");
                for (name, value) in &record {
                    println!("{name}: {value}");
                }
                println!();
            }
            Ok(None) => println!("== {path}: DESCRIPTION is empty\n"),
            Err(e @ (Error::ArchiveNotFound { .. } | Error::NotArchive { .. })) => {
                eprintln!("skipping {path}: {e}");
                status = ExitCode::FAILURE;
            }
            Err(e) => {
                eprintln!("error: {e}");
                status = ExitCode::FAILURE;
            }
        }
    }

    status
}
