//! Dirload Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, error handling and logging for the dirload workspace.
//!
//! # Overview
//!
//! - **Types**: [`Record`] (one parsed directory row) and [`DocumentKey`]
//!   (the normalized email a record is stored under)
//! - **Error Handling**: [`DirloadError`] and the [`Result`] alias
//! - **Logging**: tracing subscriber setup shared by every binary
//!
//! # Example
//!
//! ```
//! use dirload_common::types::{DocumentKey, Record};
//!
//! let mut record = Record::new();
//! record.insert("email", " Ada@Example.org ");
//! assert_eq!(record.document_key(), DocumentKey::from_email("ada@example.org"));
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{DirloadError, Result};
pub use types::{DocumentKey, Record};
