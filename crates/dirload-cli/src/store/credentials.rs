//! Service-account credentials and request authorization
//!
//! [`ServiceAccount`] checks the key file exists and reads its identifying
//! fields. [`Authorization`] turns configuration into the bearer token sent
//! with each write; signing and token exchange are left to `gcp_auth`.

use crate::error::{CliError, Result};
use gcp_auth::{CustomServiceAccount, TokenProvider};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

const SERVICE_ACCOUNT_TYPE: &str = "service_account";

/// OAuth scope granting read/write access to Firestore.
pub const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";

/// Identifying fields of a Google service-account key file
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccount {
    #[serde(rename = "type")]
    pub account_type: Option<String>,
    pub project_id: String,
    pub client_email: Option<String>,
}

impl ServiceAccount {
    /// Load a key file, failing fast when it is missing
    ///
    /// A missing path is [`CliError::MissingCredentials`]: the run stops before
    /// the input file is even opened.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();

        if !path.is_file() {
            return Err(CliError::MissingCredentials(display));
        }

        let content = std::fs::read_to_string(path)?;
        let account: ServiceAccount = serde_json::from_str(&content)
            .map_err(|e| CliError::invalid_credentials(&display, e.to_string()))?;

        if let Some(kind) = account.account_type.as_deref() {
            if kind != SERVICE_ACCOUNT_TYPE {
                return Err(CliError::invalid_credentials(
                    &display,
                    format!("expected type '{}', found '{}'", SERVICE_ACCOUNT_TYPE, kind),
                ));
            }
        }

        if account.project_id.trim().is_empty() {
            return Err(CliError::invalid_credentials(&display, "project_id is empty"));
        }

        info!(
            project_id = %account.project_id,
            client_email = account.client_email.as_deref().unwrap_or("-"),
            "Loaded service account credentials"
        );

        Ok(account)
    }
}

/// How requests to the document store are authorized
#[derive(Clone, Default)]
pub enum Authorization {
    /// No `Authorization` header
    #[default]
    Anonymous,
    /// Fixed bearer token (configured token or emulator owner)
    Bearer(String),
    /// Tokens minted from a service-account key, cached and refreshed by gcp_auth
    ServiceAccount(Arc<CustomServiceAccount>),
}

impl Authorization {
    /// Build service-account authorization from a key file
    ///
    /// The private key is parsed here, so a malformed key fails before any
    /// record is processed.
    pub fn from_key_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let account = CustomServiceAccount::from_file(path)
            .map_err(|e| CliError::invalid_credentials(path.display().to_string(), e.to_string()))?;

        debug!(path = %path.display(), "Service account signer ready");
        Ok(Self::ServiceAccount(Arc::new(account)))
    }

    /// Token for the next request, if this authorization sends one
    pub async fn bearer_token(&self) -> Result<Option<String>> {
        match self {
            Authorization::Anonymous => Ok(None),
            Authorization::Bearer(token) => Ok(Some(token.clone())),
            Authorization::ServiceAccount(account) => {
                let token = account
                    .token(&[DATASTORE_SCOPE])
                    .await
                    .map_err(|e| CliError::Auth(e.to_string()))?;
                Ok(Some(token.as_str().to_string()))
            },
        }
    }
}

impl fmt::Debug for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Authorization::Anonymous => f.write_str("Anonymous"),
            Authorization::Bearer(_) => f.write_str("Bearer(<redacted>)"),
            Authorization::ServiceAccount(_) => f.write_str("ServiceAccount"),
        }
    }
}
