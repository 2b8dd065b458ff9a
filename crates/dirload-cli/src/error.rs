//! Error types for the dirload CLI
//!
//! User-facing error types with messages that say what went wrong and how to
//! fix it. Per-record upload failures are not errors at this level; the
//! upload driver turns them into [`crate::upload::RecordOutcome`] values.

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    /// Service-account key file is missing; nothing is parsed or uploaded
    #[error("Service account key file not found at '{0}'. Download a key for the project and pass it with --credentials.")]
    MissingCredentials(String),

    /// Service-account key file exists but is not usable
    #[error("Invalid service account key '{path}': {reason}")]
    InvalidCredentials { path: String, reason: String },

    /// Access token could not be obtained for a request
    #[error("Failed to obtain an access token: {0}")]
    Auth(String),

    /// Input file is missing or unreadable
    #[error("File not found: '{0}'. Verify the file path exists and you have read permissions.")]
    FileNotFound(String),

    /// Input file is not valid UTF-8
    #[error("Failed to decode '{path}' as UTF-8: {source}")]
    Decode {
        path: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// Document store rejected a write
    #[error("Document store returned {status}: {message}")]
    Store { status: u16, message: String },

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}. Check your environment variables or command-line flags.")]
    Config(String),

    /// Shared-library failure (logging setup, key parsing)
    #[error(transparent)]
    Common(#[from] dirload_common::DirloadError),

    /// File system operation failed
    #[error("File operation failed: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("Network request failed: {0}. Check your internet connection and endpoint.")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl CliError {
    /// Create a store error
    pub fn store(status: u16, message: impl Into<String>) -> Self {
        Self::Store {
            status,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid credentials error
    pub fn invalid_credentials(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCredentials {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error aborts the run before any record is touched
    pub fn is_fatal_setup(&self) -> bool {
        matches!(self, Self::MissingCredentials(_) | Self::InvalidCredentials { .. })
    }
}
