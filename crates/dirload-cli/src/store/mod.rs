//! Document store abstraction
//!
//! The upload driver only needs one capability from the backend: replace the
//! document at `collection/key` with a record's fields. [`DocumentStore`] is
//! that capability, injected into [`crate::upload::Uploader`] so the driver
//! can run against Firestore or against [`MemoryStore`].

pub mod credentials;
pub mod firestore;

pub use credentials::{Authorization, ServiceAccount};
pub use firestore::{FirestoreConfig, FirestoreStore};

use crate::error::{CliError, Result};
use async_trait::async_trait;
use dirload_common::{DocumentKey, Record};
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

/// Keyed full-document writes (dependency injection)
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create or fully overwrite the document at `collection/key`
    ///
    /// Fields present in a previous version but absent from `record` are
    /// removed. Writing the same record twice leaves the same state.
    async fn set_document(&self, collection: &str, key: &DocumentKey, record: &Record) -> Result<()>;
}

/// In-process store used for dry runs and tests
///
/// Keeps the latest record per `(collection, key)` and the order in which
/// writes were attempted.
#[derive(Default)]
pub struct MemoryStore {
    documents: Mutex<BTreeMap<(String, String), Record>>,
    attempts: Mutex<Vec<String>>,
    failing_keys: HashSet<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write to `key` fail with a 500 store error
    pub fn fail_on(mut self, key: impl Into<String>) -> Self {
        self.failing_keys.insert(key.into());
        self
    }

    /// Stored document for `collection/key`
    pub fn get(&self, collection: &str, key: &str) -> Option<Record> {
        self.documents
            .lock()
            .ok()?
            .get(&(collection.to_string(), key.to_string()))
            .cloned()
    }

    /// Snapshot of all stored documents
    pub fn documents(&self) -> BTreeMap<(String, String), Record> {
        self.documents
            .lock()
            .map(|docs| docs.clone())
            .unwrap_or_default()
    }

    /// Keys of every attempted write, in call order
    pub fn attempts(&self) -> Vec<String> {
        self.attempts
            .lock()
            .map(|attempts| attempts.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn set_document(&self, collection: &str, key: &DocumentKey, record: &Record) -> Result<()> {
        self.attempts
            .lock()
            .map_err(|_| CliError::config("memory store lock poisoned"))?
            .push(key.to_string());

        if self.failing_keys.contains(key.as_str()) {
            return Err(CliError::store(500, format!("simulated failure for {}", key)));
        }

        self.documents
            .lock()
            .map_err(|_| CliError::config("memory store lock poisoned"))?
            .insert((collection.to_string(), key.to_string()), record.clone());

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn key(email: &str) -> DocumentKey {
        DocumentKey::from_email(email).unwrap()
    }

    #[tokio::test]
    async fn test_memory_store_overwrites_whole_document() {
        let store = MemoryStore::new();
        let first: Record = vec![("email", "a@x.org"), ("phone", "555")].into_iter().collect();
        let second: Record = vec![("email", "a@x.org")].into_iter().collect();

        store.set_document("directory", &key("a@x.org"), &first).await.unwrap();
        store.set_document("directory", &key("a@x.org"), &second).await.unwrap();

        let stored = store.get("directory", "a@x.org").unwrap();
        assert_eq!(stored, second);
        assert_eq!(stored.get("phone"), None);
        assert_eq!(store.attempts().len(), 2);
    }

    #[tokio::test]
    async fn test_memory_store_simulated_failure() {
        let store = MemoryStore::new().fail_on("bad@x.org");
        let record: Record = vec![("email", "bad@x.org")].into_iter().collect();

        let err = store
            .set_document("directory", &key("bad@x.org"), &record)
            .await
            .unwrap_err();

        assert!(matches!(err, CliError::Store { status: 500, .. }));
        assert!(store.get("directory", "bad@x.org").is_none());
        assert_eq!(store.attempts(), vec!["bad@x.org".to_string()]);
    }
}
