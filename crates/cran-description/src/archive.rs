//! DESCRIPTION lookup inside R source package tarballs
//!
//! Source packages are distributed as `<package>_<version>.tar.gz` with the
//! metadata in `<package>/DESCRIPTION`. Plain `.tar` files are accepted as
//! well; gzip compression is detected from the magic bytes, not the file
//! extension.
//!
//! The parser never touches this module. Anything that can produce the
//! DESCRIPTION bytes can stand in for [`TarballSource`] by implementing
//! [`DescriptionSource`].

use crate::error::{Error, Result};
use crate::parser::decode_bytes;
use crate::record::Record;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Member file name holding package metadata
pub const DESCRIPTION_FILE: &str = "DESCRIPTION";

/// Leading bytes of a gzip stream
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Capability to fetch the raw DESCRIPTION bytes for an archive
pub trait DescriptionSource {
    /// Return the DESCRIPTION contents of `archive`
    ///
    /// Fails with [`Error::ArchiveNotFound`], [`Error::NotArchive`] or
    /// [`Error::DescriptionNotFound`] so callers can branch on the cause.
    fn read_description(&self, archive: &Path) -> Result<Vec<u8>>;
}

/// Which archive member counts as the DESCRIPTION file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberMatch {
    /// First regular file whose path contains this text
    Contains(String),
    /// Exactly `<package>/DESCRIPTION`, with `<package>` taken from the
    /// archive file name up to its first underscore
    PackageRoot,
}

impl Default for MemberMatch {
    fn default() -> Self {
        Self::Contains(DESCRIPTION_FILE.to_string())
    }
}

impl MemberMatch {
    /// Check a member path against this rule
    pub fn matches(&self, member: &Path, package: Option<&str>) -> bool {
        match self {
            Self::Contains(needle) => member.to_string_lossy().contains(needle.as_str()),
            Self::PackageRoot => {
                package.is_some_and(|package| member == Path::new(package).join(DESCRIPTION_FILE))
            }
        }
    }
}

/// Archive lookup configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveConfig {
    /// Rule selecting the DESCRIPTION member (default: path contains `DESCRIPTION`)
    pub member: MemberMatch,
    /// Largest member that will be read into memory (default: 16 MiB)
    pub max_member_size: u64,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            member: MemberMatch::default(),
            max_member_size: 16 * 1024 * 1024,
        }
    }
}

impl ArchiveConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the member selection rule
    pub fn with_member_match(mut self, member: MemberMatch) -> Self {
        self.member = member;
        self
    }

    /// Set the member size limit
    pub fn with_max_member_size(mut self, limit: u64) -> Self {
        self.max_member_size = limit;
        self
    }
}

/// Package name encoded in a source tarball file name
///
/// `abc_2.1.tar.gz` yields `abc`. Names without a version suffix fall back
/// to the file name minus its archive extension.
pub fn package_name_from_path(path: &Path) -> Option<&str> {
    let file_name = path.file_name()?.to_str()?;
    let name = match file_name.split_once('_') {
        Some((name, _)) => name,
        None => [".tar.gz", ".tgz", ".tar"]
            .iter()
            .find_map(|ext| file_name.strip_suffix(ext))
            .unwrap_or(file_name),
    };
    (!name.is_empty()).then_some(name)
}

/// Reads DESCRIPTION from `.tar` and `.tar.gz` source packages
#[derive(Debug, Clone, Default)]
pub struct TarballSource {
    config: ArchiveConfig,
}

impl TarballSource {
    /// Create a source with the given configuration
    pub fn new(config: ArchiveConfig) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    /// Read DESCRIPTION from an already opened archive stream
    ///
    /// `label` names the archive in errors and supplies the package name
    /// for [`MemberMatch::PackageRoot`].
    pub fn read_description_from<R: Read>(&self, reader: R, label: &Path) -> Result<Vec<u8>> {
        let mut reader = BufReader::new(reader);
        let head = reader.fill_buf()?;
        if head.is_empty() {
            return Err(Error::NotArchive {
                path: label.to_path_buf(),
                reason: "empty file".to_string(),
            });
        }
        let compressed = head.starts_with(&GZIP_MAGIC);

        if compressed {
            debug!("Reading gzip-compressed tarball {}", label.display());
            self.find_member(GzDecoder::new(reader), label)
        } else {
            debug!("Reading uncompressed tarball {}", label.display());
            self.find_member(reader, label)
        }
    }

    fn find_member<R: Read>(&self, reader: R, label: &Path) -> Result<Vec<u8>> {
        let package = package_name_from_path(label);
        let mut archive = tar::Archive::new(reader);
        let entries = archive.entries().map_err(|e| not_archive(label, &e))?;

        for (index, entry) in entries.enumerate() {
            let mut entry = match entry {
                Ok(entry) => entry,
                Err(e) if index == 0 => return Err(not_archive(label, &e)),
                Err(e) => return Err(e.into()),
            };

            if !entry.header().entry_type().is_file() {
                continue;
            }

            let member = entry.path()?.into_owned();
            if !self.config.member.matches(&member, package) {
                trace!("Skipping archive member {}", member.display());
                continue;
            }

            let size = entry.size();
            if size > self.config.max_member_size {
                return Err(Error::MemberTooLarge {
                    path: label.to_path_buf(),
                    size,
                    limit: self.config.max_member_size,
                });
            }

            let mut data = Vec::with_capacity(usize::try_from(size).unwrap_or_default());
            entry.read_to_end(&mut data)?;
            debug!(
                "Read {} ({} bytes) from {}",
                member.display(),
                data.len(),
                label.display()
            );
            return Ok(data);
        }

        Err(Error::DescriptionNotFound {
            path: label.to_path_buf(),
        })
    }
}

impl DescriptionSource for TarballSource {
    fn read_description(&self, archive: &Path) -> Result<Vec<u8>> {
        let metadata = match std::fs::metadata(archive) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::ArchiveNotFound {
                    path: archive.to_path_buf(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        if !metadata.is_file() {
            return Err(Error::NotArchive {
                path: archive.to_path_buf(),
                reason: "not a regular file".to_string(),
            });
        }

        let file = File::open(archive)?;
        self.read_description_from(file, archive)
    }
}

fn not_archive(path: &Path, err: &std::io::Error) -> Error {
    Error::NotArchive {
        path: PathBuf::from(path),
        reason: err.to_string(),
    }
}

/// Read the package record from a source tarball
///
/// Returns `Ok(None)` when the DESCRIPTION member holds no fields.
///
/// # Examples
///
/// ```no_run
/// let record = cran_description::from_file("abc_2.1.tar.gz")?;
/// if let Some(record) = record {
///     println!("{} {}", record.package().unwrap_or("?"), record.version().unwrap_or("?"));
/// }
/// # Ok::<(), cran_description::Error>(())
/// ```
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Option<Record>> {
    from_source(&TarballSource::default(), path)
}

/// Read the package record through any [`DescriptionSource`]
pub fn from_source<S, P>(source: &S, path: P) -> Result<Option<Record>>
where
    S: DescriptionSource + ?Sized,
    P: AsRef<Path>,
{
    let bytes = source.read_description(path.as_ref())?;
    decode_bytes(&bytes)
}

/// Read the package record from an open tarball stream
pub fn from_archive_reader<R: Read>(reader: R, label: &Path) -> Result<Option<Record>> {
    let bytes = TarballSource::default().read_description_from(reader, label)?;
    decode_bytes(&bytes)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_package_name_from_path() {
        assert_eq!(
            package_name_from_path(Path::new("/tmp/abc_2.1.tar.gz")),
            Some("abc")
        );
        assert_eq!(
            package_name_from_path(Path::new("abc.data_1.0.tar.gz")),
            Some("abc.data")
        );
        assert_eq!(package_name_from_path(Path::new("A3.tgz")), Some("A3"));
        assert_eq!(package_name_from_path(Path::new("A3.tar")), Some("A3"));
        assert_eq!(package_name_from_path(Path::new("_1.0.tar.gz")), None);
        assert_eq!(package_name_from_path(Path::new("/")), None);
    }

    #[test]
    fn test_contains_match() {
        let rule = MemberMatch::default();
        assert!(rule.matches(Path::new("abc/DESCRIPTION"), None));
        assert!(rule.matches(Path::new("abc/inst/DESCRIPTION.in"), None));
        assert!(!rule.matches(Path::new("abc/NAMESPACE"), None));
    }

    #[test]
    fn test_package_root_match() {
        let rule = MemberMatch::PackageRoot;
        assert!(rule.matches(Path::new("abc/DESCRIPTION"), Some("abc")));
        assert!(!rule.matches(Path::new("abc/inst/DESCRIPTION"), Some("abc")));
        assert!(!rule.matches(Path::new("abd/DESCRIPTION"), Some("abc")));
        assert!(!rule.matches(Path::new("abc/DESCRIPTION"), None));
    }

    #[test]
    fn test_config_builder() {
        let config = ArchiveConfig::new()
            .with_member_match(MemberMatch::PackageRoot)
            .with_max_member_size(1024);
        assert_eq!(config.member, MemberMatch::PackageRoot);
        assert_eq!(config.max_member_size, 1024);

        let source = TarballSource::new(config.clone());
        assert_eq!(source.config(), &config);
        assert_eq!(
            TarballSource::default().config().member,
            MemberMatch::Contains("DESCRIPTION".to_string())
        );
    }

    #[test]
    fn test_missing_archive() {
        let result = from_file("/nonexistent/abc_2.1.tar.gz");
        assert!(matches!(result, Err(Error::ArchiveNotFound { .. })));
    }

    #[test]
    fn test_empty_stream_is_not_archive() {
        let result = from_archive_reader(std::io::empty(), Path::new("empty.tar"));
        assert!(matches!(result, Err(Error::NotArchive { .. })));
    }

    struct FixedSource(&'static str);

    impl DescriptionSource for FixedSource {
        fn read_description(&self, _archive: &Path) -> Result<Vec<u8>> {
            Ok(self.0.as_bytes().to_vec())
        }
    }

    #[test]
    fn test_custom_source() {
        let source = FixedSource("Package: abc\nVersion: 2.1\nPackage: ignored");
        let record = from_source(&source, "anything").unwrap().unwrap();
        assert_eq!(record.package(), Some("abc"));
        assert_eq!(record.len(), 2);

        let blank = FixedSource("\n\n");
        assert!(from_source(&blank, "anything").unwrap().is_none());
    }
}
