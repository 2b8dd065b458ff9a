//! `dirload preview` command implementation
//!
//! Shows parsed records and the document key each would be written under.

use crate::error::Result;
use crate::parser;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use dirload_common::Record;
use std::path::Path;

/// Summary of a preview
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewSummary {
    pub records: usize,
    pub without_key: usize,
}

/// Parse `input` and print up to `limit` rows
pub fn run(input: &Path, limit: usize) -> Result<PreviewSummary> {
    let records = parser::parse_file(input)?;

    if records.is_empty() {
        println!("No records found in {}", input.display());
        return Ok(PreviewSummary { records: 0, without_key: 0 });
    }

    println!("{}", render_table(&records, limit));

    let summary = summarize(&records);
    println!();
    println!("{}", "Summary:".cyan().bold());
    println!("  Records:          {}", summary.records);
    println!("  Without email:    {}", summary.without_key);
    if records.len() > limit {
        println!("  (showing first {} rows)", limit);
    }

    Ok(summary)
}

/// Count records and those that would be skipped
pub fn summarize(records: &[Record]) -> PreviewSummary {
    PreviewSummary {
        records: records.len(),
        without_key: records.iter().filter(|r| r.document_key().is_none()).count(),
    }
}

/// Field names across all records, in first-seen order
pub fn column_names(records: &[Record]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in records.iter().flat_map(Record::fields) {
        if !names.iter().any(|existing| existing == name) {
            names.push(name.to_string());
        }
    }
    names
}

fn render_table(records: &[Record], limit: usize) -> Table {
    let columns = column_names(records);

    let mut header = vec!["document key".to_string()];
    header.extend(columns.iter().cloned());

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(header);

    for record in records.iter().take(limit) {
        let key = record
            .document_key()
            .map(|key| key.to_string())
            .unwrap_or_else(|| "(skipped)".to_string());

        let mut row = vec![key];
        row.extend(
            columns
                .iter()
                .map(|name| record.get(name).unwrap_or_default().to_string()),
        );
        table.add_row(row);
    }

    table
}
