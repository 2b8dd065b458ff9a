//! Configuration for dirload runs
//!
//! Defaults, then environment variables (optionally from a `.env` file),
//! then command-line flags.

use crate::error::{CliError, Result};
use crate::store::firestore::{DEFAULT_FIRESTORE_URL, DEFAULT_TIMEOUT_SECS};
use dirload_common::types::DEFAULT_COLLECTION;
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// Configuration Constants
// ============================================================================

/// Directory file read when no input is given.
pub const DEFAULT_INPUT: &str = "info.txt";

/// Service-account key read when no credentials path is given.
pub const DEFAULT_CREDENTIALS: &str = "./your-firebase-adminsdk.json";

/// Upload configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Tab-separated directory file
    pub input: PathBuf,

    /// Service-account key file
    pub credentials: PathBuf,

    /// Target collection
    pub collection: String,

    /// Firestore endpoint override (emulator or proxy)
    pub endpoint: Option<String>,

    /// Project override; defaults to the key file's `project_id`
    pub project_id: Option<String>,

    pub access_token: Option<String>,

    pub timeout_secs: u64,

    /// Parse and key records without writing anywhere
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            credentials: PathBuf::from(DEFAULT_CREDENTIALS),
            collection: DEFAULT_COLLECTION.to_string(),
            endpoint: None,
            project_id: None,
            access_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            dry_run: false,
        }
    }
}

impl Config {
    /// Load config from environment variables
    ///
    /// - `DIRLOAD_INPUT`, `DIRLOAD_CREDENTIALS`, `DIRLOAD_COLLECTION`
    /// - `DIRLOAD_ENDPOINT`, or `FIRESTORE_EMULATOR_HOST` (`host:port`)
    /// - `DIRLOAD_PROJECT_ID`, `DIRLOAD_ACCESS_TOKEN`, `DIRLOAD_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(input) = std::env::var("DIRLOAD_INPUT") {
            config.input = PathBuf::from(input);
        }

        if let Ok(credentials) = std::env::var("DIRLOAD_CREDENTIALS") {
            config.credentials = PathBuf::from(credentials);
        }

        if let Ok(collection) = std::env::var("DIRLOAD_COLLECTION") {
            config.collection = collection;
        }

        config.endpoint = std::env::var("DIRLOAD_ENDPOINT").ok().or_else(|| {
            std::env::var("FIRESTORE_EMULATOR_HOST")
                .ok()
                .map(|host| format!("http://{}", host))
        });

        config.project_id = std::env::var("DIRLOAD_PROJECT_ID").ok();
        config.access_token = std::env::var("DIRLOAD_ACCESS_TOKEN").ok();

        if let Ok(timeout) = std::env::var("DIRLOAD_TIMEOUT_SECS") {
            config.timeout_secs = timeout.parse().map_err(|_| {
                CliError::config(format!("DIRLOAD_TIMEOUT_SECS must be a number of seconds, got '{}'", timeout))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings no run could succeed with
    pub fn validate(&self) -> Result<()> {
        let collection = self.collection.trim();
        if collection.is_empty() || collection.contains('/') {
            return Err(CliError::config(format!(
                "collection '{}' must be a non-empty name without '/'",
                self.collection
            )));
        }

        if self.timeout_secs == 0 {
            return Err(CliError::config("timeout must be at least one second"));
        }

        Ok(())
    }

    /// Firestore base URL, honoring the endpoint override
    pub fn base_url(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_FIRESTORE_URL)
    }

    /// Whether writes target a local emulator or proxy instead of Google
    pub fn is_emulated(&self) -> bool {
        self.endpoint.is_some()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
