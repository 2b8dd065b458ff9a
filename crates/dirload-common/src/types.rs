//! Shared domain types for dirload
//!
//! A [`Record`] is one row of a directory file; a [`DocumentKey`] is the
//! identifier that row is stored under in the document database.

use crate::error::{DirloadError, Result};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Constants
// ============================================================================

/// Field a record's document key is derived from.
pub const EMAIL_FIELD: &str = "email";

/// Collection directory records are written to unless overridden.
pub const DEFAULT_COLLECTION: &str = "directory";

// ============================================================================
// Record
// ============================================================================

/// One parsed row of a directory file
///
/// Fields keep the order of the header row. Inserting a field name that is
/// already present replaces the value but keeps the original position, so a
/// duplicated header column keeps its first slot and its last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any existing value for the same name
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();

        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Look up a field by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    /// Number of fields present
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate `(name, value)` pairs in header order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Field names in header order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Raw value of the `email` field, if the row had one
    pub fn email(&self) -> Option<&str> {
        self.get(EMAIL_FIELD)
    }

    /// Document key derived from the `email` field
    ///
    /// Returns `None` when the field is absent or blank after trimming.
    pub fn document_key(&self) -> Option<DocumentKey> {
        self.email().and_then(DocumentKey::from_email)
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

// ============================================================================
// DocumentKey
// ============================================================================

/// Normalized email used as a document identifier
///
/// Always non-empty, trimmed and lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentKey(String);

impl DocumentKey {
    /// Derive a key from a raw email value
    ///
    /// Whitespace-only input yields `None`, the same as a missing email.
    pub fn from_email(email: &str) -> Option<Self> {
        let normalized = email.trim().to_lowercase();
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DocumentKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for DocumentKey {
    type Err = DirloadError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_email(s)
            .ok_or_else(|| DirloadError::Parse(format!("'{}' is not a usable document key", s)))
    }
}

impl TryFrom<String> for DocumentKey {
    type Error = DirloadError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<DocumentKey> for String {
    fn from(key: DocumentKey) -> Self {
        key.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_record_keeps_header_order() {
        let record: Record = vec![("b", "2"), ("a", "1"), ("c", "3")].into_iter().collect();
        let names: Vec<&str> = record.fields().collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_record_duplicate_field_keeps_first_slot() {
        let mut record = Record::new();
        record.insert("name", "first");
        record.insert("email", "a@b.c");
        record.insert("name", "second");

        assert_eq!(record.len(), 2);
        assert_eq!(record.get("name"), Some("second"));
        assert_eq!(record.fields().next(), Some("name"));
    }

    #[test]
    fn test_record_serializes_as_ordered_object() {
        let record: Record = vec![("z", "1"), ("a", "2")].into_iter().collect();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"z":"1","a":"2"}"#);
    }

    #[test]
    fn test_document_key_normalization() {
        let a = DocumentKey::from_email(" Foo@Bar.com ").unwrap();
        let b = DocumentKey::from_email("foo@bar.com").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "foo@bar.com");
    }

    #[test]
    fn test_document_key_rejects_blank() {
        assert_eq!(DocumentKey::from_email(""), None);
        assert_eq!(DocumentKey::from_email("   \t"), None);
        assert!("  ".parse::<DocumentKey>().is_err());
    }

    #[test]
    fn test_record_document_key() {
        let mut record = Record::new();
        assert_eq!(record.document_key(), None);

        record.insert("email", "  ");
        assert_eq!(record.document_key(), None);

        record.insert("email", "Grace@Navy.MIL");
        assert_eq!(record.document_key().unwrap().as_str(), "grace@navy.mil");
    }

    proptest! {
        #[test]
        fn prop_key_ignores_case_and_padding(local in "[A-Za-z0-9]{1,12}", pad in " {0,3}") {
            let raw = format!("{pad}{local}@Example.COM{pad}");
            let key = DocumentKey::from_email(&raw).unwrap();
            let expected = format!("{}@example.com", local.to_lowercase());
            prop_assert_eq!(key.as_str(), expected.as_str());
        }
    }
}
