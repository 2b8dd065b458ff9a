//! dirload - Main entry point

use clap::Parser;
use dirload_cli::{Cli, CliError, Commands, Config};
use dirload_common::logging::{init_logging, LogConfig, LogLevel};
use std::process;
use tracing::error;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // The CLI still works if logging cannot be configured or installed
    let log_config = dirload_cli::log_config(cli.verbose).unwrap_or_else(|e| {
        eprintln!("Warning: {}", e);
        LogConfig::builder().level(LogLevel::Warn).build()
    });

    let _guard = match init_logging(&log_config).map_err(CliError::from) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Warning: logging disabled: {}", e);
            None
        },
    };

    if let Err(e) = execute_command(&cli).await {
        error!(error = %e, fatal_setup = e.is_fatal_setup(), "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> dirload_cli::Result<()> {
    match &cli.command {
        Commands::Upload(args) => {
            let mut config = Config::from_env()?;
            args.apply(&mut config);
            dirload_cli::commands::upload::run(config).await?;
            Ok(())
        },

        Commands::Preview(args) => {
            let input = match &args.input {
                Some(input) => input.clone(),
                None => Config::from_env()?.input,
            };
            dirload_cli::commands::preview::run(&input, args.limit)?;
            Ok(())
        },
    }
}
