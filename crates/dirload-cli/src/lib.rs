//! Dirload CLI Library
//!
//! Loads a tab-separated directory file into a Firestore collection, one
//! document per row, keyed by the row's normalized email address.
//!
//! # Overview
//!
//! - **Parsing**: [`parser`] turns the file into ordered [`Record`]s
//! - **Uploading**: [`upload::Uploader`] writes each record through a
//!   [`store::DocumentStore`] and tallies successes and failures
//! - **Preview**: `dirload preview` shows parsed rows and their keys without
//!   touching the network
//!
//! Re-running an upload with the same file is safe: every write is a full
//! overwrite of the document at the record's key.

pub mod commands;
pub mod config;
pub mod error;
pub mod parser;
pub mod store;
pub mod upload;

// Re-export commonly used types
pub use config::Config;
pub use dirload_common::{DocumentKey, Record};
pub use error::{CliError, Result};

use clap::{Args, Parser, Subcommand};
use dirload_common::logging::{LogConfig, LogLevel, LogOutput};
use std::path::PathBuf;

/// Logging settings for a run
///
/// `--verbose` picks debug level, otherwise warn. `LOG_*` environment
/// variables override either; an invalid value is a [`CliError::Common`].
pub fn log_config(verbose: bool) -> Result<LogConfig> {
    let config = LogConfig::builder()
        .level(if verbose { LogLevel::Debug } else { LogLevel::Warn })
        .output(LogOutput::Console)
        .log_file_prefix("dirload")
        .build();

    Ok(config.merge_env()?)
}

/// dirload - upload a tab-separated directory into Firestore
#[derive(Parser, Debug)]
#[command(name = "dirload")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload every record to the document store
    Upload(UploadArgs),

    /// Parse the input file and show records with their document keys
    Preview(PreviewArgs),
}

/// Flags for `dirload upload`
#[derive(Args, Debug, Default)]
pub struct UploadArgs {
    /// Tab-separated input file [default: info.txt]
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Service account key file [default: ./your-firebase-adminsdk.json]
    #[arg(short, long)]
    pub credentials: Option<PathBuf>,

    /// Target collection [default: directory]
    #[arg(long)]
    pub collection: Option<String>,

    /// Firestore endpoint override, e.g. an emulator URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Project ID override (defaults to the key file's project_id)
    #[arg(long)]
    pub project_id: Option<String>,

    /// Parse and key records without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

impl UploadArgs {
    /// Layer the flags that were given over `config`
    pub fn apply(&self, config: &mut Config) {
        if let Some(input) = &self.input {
            config.input = input.clone();
        }
        if let Some(credentials) = &self.credentials {
            config.credentials = credentials.clone();
        }
        if let Some(collection) = &self.collection {
            config.collection = collection.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = Some(endpoint.clone());
        }
        if let Some(project_id) = &self.project_id {
            config.project_id = Some(project_id.clone());
        }
        if self.dry_run {
            config.dry_run = true;
        }
    }
}

/// Flags for `dirload preview`
#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Tab-separated input file [default: info.txt]
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Maximum number of rows to show
    #[arg(short, long, default_value = "20")]
    pub limit: usize,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_upload_args_override_config() {
        let cli = Cli::try_parse_from([
            "dirload",
            "upload",
            "--input",
            "staff.tsv",
            "--collection",
            "people",
            "--dry-run",
        ])
        .unwrap();

        let Commands::Upload(args) = cli.command else {
            panic!("expected upload command");
        };

        let mut config = Config::default();
        args.apply(&mut config);

        assert_eq!(config.input, PathBuf::from("staff.tsv"));
        assert_eq!(config.collection, "people");
        assert!(config.dry_run);
        assert_eq!(config.credentials, PathBuf::from(config::DEFAULT_CREDENTIALS));
    }

    #[test]
    fn test_log_config_surfaces_bad_env() {
        std::env::set_var("LOG_FORMAT", "xml");
        let result = log_config(false);
        std::env::remove_var("LOG_FORMAT");

        assert!(matches!(result, Err(CliError::Common(_))));
        assert_eq!(log_config(true).unwrap().level, LogLevel::Debug);
    }

    #[test]
    fn test_preview_default_limit() {
        let cli = Cli::try_parse_from(["dirload", "preview", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Preview(PreviewArgs { limit: 20, .. })));
    }
}
