//! Error types for dirload

use thiserror::Error;

/// Result type alias for dirload operations
pub type Result<T> = std::result::Result<T, DirloadError>;

/// Main error type for dirload
#[derive(Error, Debug)]
pub enum DirloadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
