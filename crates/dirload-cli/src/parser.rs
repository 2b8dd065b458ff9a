//! Tab-separated directory file parser
//!
//! The first line names the fields; every following line becomes one
//! [`Record`]. Empty tokens are dropped before values are paired with
//! headers, so a short or gappy line simply carries fewer fields:
//!
//! ```text
//! a<TAB>b<TAB>c
//! 1<TAB><TAB>3      ->  {a: "1", b: "3"}
//! ```
//!
//! Embedded tabs and newlines inside a field are not supported.

use crate::error::{CliError, Result};
use dirload_common::Record;
use std::path::Path;
use tracing::{debug, info};

const DELIMITER: char = '\t';

/// Read and parse a whole directory file
///
/// The file is read into memory at once. A path that cannot be read maps to
/// [`CliError::FileNotFound`]; bytes that are not UTF-8 map to
/// [`CliError::Decode`].
pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    let path = path.as_ref();

    let bytes = std::fs::read(path).map_err(|e| {
        debug!(path = %path.display(), error = %e, "Failed to read input file");
        CliError::FileNotFound(path.display().to_string())
    })?;

    let content = String::from_utf8(bytes).map_err(|source| CliError::Decode {
        path: path.display().to_string(),
        source,
    })?;

    let records = parse_str(&content);
    info!(path = %path.display(), records = records.len(), "Parsed directory file");

    Ok(records)
}

/// Parse directory text already held in memory
///
/// Empty input, or input with only a header line, yields no records.
pub fn parse_str(content: &str) -> Vec<Record> {
    let mut lines = content.lines();

    let Some(header_line) = lines.next() else {
        return Vec::new();
    };

    let headers: Vec<&str> = header_line.trim().split(DELIMITER).collect();
    debug!(columns = headers.len(), "Read header row");

    lines.map(|line| parse_line(&headers, line)).collect()
}

fn parse_line(headers: &[&str], line: &str) -> Record {
    let values = line
        .trim()
        .split(DELIMITER)
        .filter(|value| !value.is_empty());

    headers.iter().copied().zip(values).collect()
}
