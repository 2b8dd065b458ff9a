//! `dirload upload` command implementation
//!
//! Checks credentials, parses the input file and writes every record.

use crate::config::Config;
use crate::error::Result;
use crate::parser;
use crate::store::firestore::EMULATOR_TOKEN;
use crate::store::{
    Authorization, DocumentStore, FirestoreConfig, FirestoreStore, MemoryStore, ServiceAccount,
};
use crate::upload::{RecordOutcome, UploadReport, Uploader};
use colored::Colorize;
use dirload_common::Record;
use std::path::PathBuf;
use tracing::info;

/// Where the bearer token for store requests comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    /// `DIRLOAD_ACCESS_TOKEN`
    Configured(String),
    /// Endpoint override without a token: the emulator owner token
    Emulator,
    /// Minted from the service-account key file
    ServiceAccountKey(PathBuf),
}

/// How the upload report describes what happened to each record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    Live,
    DryRun,
}

/// Run an upload with the given configuration
///
/// Only setup problems (missing or unusable credentials, unreadable input)
/// are returned as errors. Per-record failures are reported and counted.
pub async fn run(config: Config) -> Result<UploadReport> {
    config.validate()?;

    if config.dry_run {
        let records = parser::parse_file(&config.input)?;
        println!("{} Dry run: nothing will be written", "→".cyan());

        let store = MemoryStore::new();
        return Ok(upload_records(&store, &config.collection, &records, ReportMode::DryRun).await);
    }

    let account = ServiceAccount::load(&config.credentials)?;
    let auth = authorization(token_source(&config))?;
    println!("{} Credentials loaded for project {}", "✓".green(), account.project_id);

    let records = parser::parse_file(&config.input)?;
    println!("{} Parsed {} record(s) from {}", "✓".green(), records.len(), config.input.display());

    let store = FirestoreStore::new(firestore_config(&config, &account, auth))?;
    Ok(upload_records(&store, &config.collection, &records, ReportMode::Live).await)
}

/// Pick the token source: explicit token, then emulator, then the key file
pub fn token_source(config: &Config) -> TokenSource {
    match (&config.access_token, config.is_emulated()) {
        (Some(token), _) => TokenSource::Configured(token.clone()),
        (None, true) => TokenSource::Emulator,
        (None, false) => TokenSource::ServiceAccountKey(config.credentials.clone()),
    }
}

/// Turn a token source into request authorization
pub fn authorization(source: TokenSource) -> Result<Authorization> {
    match source {
        TokenSource::Configured(token) => Ok(Authorization::Bearer(token)),
        TokenSource::Emulator => Ok(Authorization::Bearer(EMULATOR_TOKEN.to_string())),
        TokenSource::ServiceAccountKey(path) => Authorization::from_key_file(path),
    }
}

/// Build connection settings from config, the loaded key file and auth
pub fn firestore_config(config: &Config, account: &ServiceAccount, auth: Authorization) -> FirestoreConfig {
    let project_id = config
        .project_id
        .clone()
        .unwrap_or_else(|| account.project_id.clone());

    FirestoreConfig {
        base_url: config.base_url().to_string(),
        project_id,
        auth,
        timeout: config.timeout(),
    }
}

/// Drive the upload and print one line per record plus the summary
pub async fn upload_records<S: DocumentStore + ?Sized>(
    store: &S,
    collection: &str,
    records: &[Record],
    mode: ReportMode,
) -> UploadReport {
    info!(records = records.len(), %collection, ?mode, "Starting upload");

    let uploader = Uploader::new(store, collection);
    let report = uploader
        .upload_all_with(records, |record, outcome| {
            println!("{}", outcome_line(record, outcome, mode))
        })
        .await;

    match mode {
        ReportMode::Live => println!("\nFinished uploading records to '{}'.", collection),
        ReportMode::DryRun => println!("\nFinished dry run for '{}'.", collection),
    }
    println!("Successful uploads: {}", report.tally.successes);
    println!("Failed uploads: {}", report.tally.failures);

    report
}

/// Console line for one record's outcome
pub fn outcome_line(record: &Record, outcome: &RecordOutcome, mode: ReportMode) -> String {
    let email = record.email().unwrap_or_default();

    match outcome {
        RecordOutcome::Written { key } => match mode {
            ReportMode::Live => format!("{} Successfully saved: {}", "✓".green(), email),
            ReportMode::DryRun => format!("{} Would save: {} as {}", "→".cyan(), email, key),
        },
        RecordOutcome::Skipped { reason } => {
            let shown = serde_json::to_string(record).unwrap_or_else(|_| format!("{:?}", record));
            format!("{} Skipping record ({}): {}", "!".yellow(), reason, shown)
        },
        RecordOutcome::Failed { cause, .. } => {
            format!("{} Failed to save {}: {}", "✗".red(), email, cause)
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use dirload_common::DocumentKey;
    use std::io::Write;

    fn account(project_id: &str) -> ServiceAccount {
        ServiceAccount {
            account_type: Some("service_account".to_string()),
            project_id: project_id.to_string(),
            client_email: None,
        }
    }

    #[test]
    fn test_default_run_mints_tokens_from_key_file() {
        let config = Config::default();
        assert_eq!(
            token_source(&config),
            TokenSource::ServiceAccountKey(config.credentials.clone())
        );
    }

    #[test]
    fn test_configured_token_wins_over_emulator() {
        let config = Config {
            access_token: Some("ya29.token".to_string()),
            endpoint: Some("http://localhost:8080".to_string()),
            ..Config::default()
        };
        assert_eq!(token_source(&config), TokenSource::Configured("ya29.token".to_string()));
    }

    #[test]
    fn test_emulator_without_token_uses_owner() {
        let config = Config {
            endpoint: Some("http://localhost:8080".to_string()),
            ..Config::default()
        };
        assert_eq!(token_source(&config), TokenSource::Emulator);

        let auth = authorization(TokenSource::Emulator).unwrap();
        assert!(matches!(auth, Authorization::Bearer(ref token) if token == EMULATOR_TOKEN));
    }

    #[test]
    fn test_unusable_key_file_fails_setup() {
        let mut key = tempfile::NamedTempFile::new().unwrap();
        write!(key, "{{\"type\": \"service_account\"}}").unwrap();

        let err = authorization(TokenSource::ServiceAccountKey(key.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, CliError::InvalidCredentials { .. }));
    }

    #[test]
    fn test_firestore_config_overrides() {
        let config = Config {
            project_id: Some("other".to_string()),
            endpoint: Some("http://localhost:8080".to_string()),
            ..Config::default()
        };

        let firestore = firestore_config(&config, &account("hub"), Authorization::Anonymous);
        assert_eq!(firestore.project_id, "other");
        assert_eq!(firestore.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_dry_run_lines_do_not_claim_saves() {
        let record: Record = vec![("email", "Ada@Example.org")].into_iter().collect();
        let outcome = RecordOutcome::Written {
            key: DocumentKey::from_email("Ada@Example.org").unwrap(),
        };

        let dry = outcome_line(&record, &outcome, ReportMode::DryRun);
        assert!(dry.contains("Would save: Ada@Example.org as ada@example.org"));
        assert!(!dry.contains("Successfully saved"));

        let live = outcome_line(&record, &outcome, ReportMode::Live);
        assert!(live.contains("Successfully saved: Ada@Example.org"));
    }

    #[tokio::test]
    async fn test_missing_credentials_stops_before_parsing() {
        let config = Config {
            credentials: PathBuf::from("/nonexistent/key.json"),
            input: PathBuf::from("/nonexistent/info.txt"),
            ..Config::default()
        };

        let err = run(config).await.unwrap_err();
        assert!(matches!(err, CliError::MissingCredentials(_)));
    }

    #[tokio::test]
    async fn test_dry_run_counts_without_credentials() {
        let mut input = tempfile::NamedTempFile::new().unwrap();
        write!(input, "name\temail\nAda\tada@example.org\nNobody\n").unwrap();

        let config = Config {
            input: input.path().to_path_buf(),
            credentials: PathBuf::from("/nonexistent/key.json"),
            dry_run: true,
            ..Config::default()
        };

        let report = run(config).await.unwrap();
        assert_eq!(report.tally.successes, 1);
        assert_eq!(report.tally.failures, 1);
    }
}
