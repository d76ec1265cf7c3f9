//! Ordered field storage for a single package record

use indexmap::IndexMap;
use std::fmt;

/// Well-known field names that appear in every CRAN record
pub mod fields {
    /// Package name, repeated at the start of every `PACKAGES` entry
    pub const PACKAGE: &str = "Package";
    /// Package version
    pub const VERSION: &str = "Version";
    /// Hard dependencies, kept as opaque text
    pub const DEPENDS: &str = "Depends";
    /// Imported packages, kept as opaque text
    pub const IMPORTS: &str = "Imports";
    /// License expression
    pub const LICENSE: &str = "License";
}

/// One package's metadata: field names mapped to values in insertion order
///
/// Field names are unique. Iteration and encoding follow the order in
/// which fields were first inserted; overwriting a value keeps its slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Record {
    fields: IndexMap<String, String>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty record with room for `capacity` fields
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: IndexMap::with_capacity(capacity),
        }
    }

    /// Insert a field, returning the previous value if the name was present
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.fields.insert(name.into(), value.into())
    }

    /// Get a field value by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Check whether a field is present
    pub fn contains_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over `(name, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Field names in insertion order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// The most recently added field
    pub fn last_field(&self) -> Option<(&str, &str)> {
        self.fields.last().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Append a continuation line to the most recently added field
    ///
    /// The text is trimmed and joined with a single space. Returns `false`
    /// and leaves the record untouched when there is no field to extend.
    pub fn append_continuation(&mut self, text: &str) -> bool {
        match self.fields.last_mut() {
            Some((_, value)) => {
                value.push(' ');
                value.push_str(text.trim());
                true
            }
            None => false,
        }
    }

    /// The `Package` field
    pub fn package(&self) -> Option<&str> {
        self.get(fields::PACKAGE)
    }

    /// The `Version` field
    pub fn version(&self) -> Option<&str> {
        self.get(fields::VERSION)
    }

    /// Borrow the underlying ordered map
    pub fn as_map(&self) -> &IndexMap<String, String> {
        &self.fields
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{name}: {value}")?;
        }
        Ok(())
    }
}

impl From<IndexMap<String, String>> for Record {
    fn from(fields: IndexMap<String, String>) -> Self {
        Self { fields }
    }
}

impl From<Record> for IndexMap<String, String> {
    fn from(record: Record) -> Self {
        record.fields
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        record.extend(iter);
        record
    }
}

impl<K, V> Extend<(K, V)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

impl IntoIterator for Record {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
