//! Upsert driver
//!
//! Walks parsed records once, in input order, and writes each one to the
//! injected [`DocumentStore`] under its [`DocumentKey`]. Every record ends in
//! exactly one [`RecordOutcome`]; a failed write never stops the batch and
//! nothing is retried.

use crate::store::DocumentStore;
use dirload_common::{DocumentKey, Record};
use std::fmt;
use tracing::{error, info, warn};

/// Why a record was not written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No `email` column value on the row
    MissingEmail,
    /// `email` present but only whitespace
    BlankEmail,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingEmail => f.write_str("record has no email"),
            SkipReason::BlankEmail => f.write_str("record email is blank"),
        }
    }
}

/// Result of handling one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Written { key: DocumentKey },
    Skipped { reason: SkipReason },
    Failed { key: DocumentKey, cause: String },
}

impl RecordOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RecordOutcome::Written { .. })
    }
}

/// Success and failure counters for one run
///
/// Skipped records count as failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadTally {
    pub successes: usize,
    pub failures: usize,
}

impl UploadTally {
    pub fn record(&mut self, outcome: &RecordOutcome) {
        if outcome.is_success() {
            self.successes += 1;
        } else {
            self.failures += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.successes + self.failures
    }
}

/// Tally plus the per-record outcomes, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    pub tally: UploadTally,
    pub outcomes: Vec<RecordOutcome>,
}

/// Writes records to a document store, one awaited write at a time
pub struct Uploader<'a, S: DocumentStore + ?Sized> {
    store: &'a S,
    collection: String,
}

impl<'a, S: DocumentStore + ?Sized> Uploader<'a, S> {
    pub fn new(store: &'a S, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    /// Handle a single record
    pub async fn upload_record(&self, record: &Record) -> RecordOutcome {
        let Some(email) = record.email() else {
            warn!(record = ?record, "Skipping record without email");
            return RecordOutcome::Skipped {
                reason: SkipReason::MissingEmail,
            };
        };

        let Some(key) = DocumentKey::from_email(email) else {
            warn!(record = ?record, "Skipping record with blank email");
            return RecordOutcome::Skipped {
                reason: SkipReason::BlankEmail,
            };
        };

        match self.store.set_document(&self.collection, &key, record).await {
            Ok(()) => {
                info!(%email, %key, collection = %self.collection, "Saved record");
                RecordOutcome::Written { key }
            },
            Err(e) => {
                error!(%email, %key, error = %e, "Failed to save record");
                RecordOutcome::Failed {
                    key,
                    cause: e.to_string(),
                }
            },
        }
    }

    /// Handle every record in order
    pub async fn upload_all(&self, records: &[Record]) -> UploadReport {
        self.upload_all_with(records, |_, _| {}).await
    }

    /// Handle every record in order, calling `on_outcome` after each one
    pub async fn upload_all_with<F>(&self, records: &[Record], mut on_outcome: F) -> UploadReport
    where
        F: FnMut(&Record, &RecordOutcome),
    {
        let mut report = UploadReport::default();

        for record in records {
            let outcome = self.upload_record(record).await;
            on_outcome(record, &outcome);
            report.tally.record(&outcome);
            report.outcomes.push(outcome);
        }

        info!(
            successes = report.tally.successes,
            failures = report.tally.failures,
            "Finished uploading records"
        );

        report
    }
}
