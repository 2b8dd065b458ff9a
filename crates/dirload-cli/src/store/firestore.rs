//! Firestore REST implementation of [`DocumentStore`]
//!
//! Writes go through `PATCH .../documents/{collection}/{key}` without an
//! update mask, which replaces the whole document (Firestore "set").

use crate::error::{CliError, Result};
use crate::store::credentials::Authorization;
use crate::store::DocumentStore;
use async_trait::async_trait;
use dirload_common::{DocumentKey, Record};
use reqwest::Client;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, instrument};

// ============================================================================
// Firestore Client Constants
// ============================================================================

/// Production Firestore REST endpoint.
pub const DEFAULT_FIRESTORE_URL: &str = "https://firestore.googleapis.com";

/// Default timeout for a single document write in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Token the Firestore emulator accepts as an administrator.
pub const EMULATOR_TOKEN: &str = "owner";

/// Connection settings for [`FirestoreStore`]
#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    pub base_url: String,
    pub project_id: String,
    pub auth: Authorization,
    pub timeout: Duration,
}

impl FirestoreConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_FIRESTORE_URL.to_string(),
            project_id: project_id.into(),
            auth: Authorization::Anonymous,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Firestore-backed document store
pub struct FirestoreStore {
    client: Client,
    config: FirestoreConfig,
}

#[derive(Serialize)]
struct DocumentBody<'a> {
    fields: BTreeMap<&'a str, StringValue<'a>>,
}

#[derive(Serialize)]
struct StringValue<'a> {
    #[serde(rename = "stringValue")]
    string_value: &'a str,
}

impl FirestoreStore {
    /// Create a new store client
    pub fn new(config: FirestoreConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        debug!(base_url = %config.base_url, project_id = %config.project_id, "Firestore client initialized");

        Ok(Self { client, config })
    }

    /// URL of the document at `collection/key`
    pub fn document_url(&self, collection: &str, key: &DocumentKey) -> String {
        format!(
            "{}/v1/projects/{}/databases/(default)/documents/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.project_id,
            urlencoding::encode(collection),
            urlencoding::encode(key.as_str()),
        )
    }
}

/// Encode a record as a Firestore document body
///
/// Every value is a string field. Duplicate names cannot occur since
/// [`Record`] already collapses them.
pub fn document_body(record: &Record) -> Result<serde_json::Value> {
    let body = DocumentBody {
        fields: record
            .iter()
            .map(|(name, value)| (name, StringValue { string_value: value }))
            .collect(),
    };

    Ok(serde_json::to_value(body)?)
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    #[instrument(skip(self, record), fields(fields = record.len()))]
    async fn set_document(&self, collection: &str, key: &DocumentKey, record: &Record) -> Result<()> {
        let url = self.document_url(collection, key);

        let mut request = self.client.patch(&url).json(&document_body(record)?);
        if let Some(token) = self.config.auth.bearer_token().await? {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CliError::store(status.as_u16(), message.trim()));
        }

        debug!(%url, "Document written");
        Ok(())
    }
}
