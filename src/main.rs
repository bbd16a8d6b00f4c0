//! simjobs - in-memory simulation job service
//!
//! Main entry point for the simjobs CLI and server.

mod cli;
mod server;

use clap::Parser;

use cli::{Cli, Commands, ConfigAction};
use simjobs_config::{ConfigError, ConfigLoader, ConfigValidator};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Config {
            action: ConfigAction::Check,
        }) => Ok(check_config_file(&cli.config)?),
        Some(Commands::Run { host, port }) => start(&cli.config, host, port).await,
        None => start(&cli.config, None, None).await,
    }
}

async fn start(
    path: &std::path::Path,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (config, from_file) = server::load_config(path, host, port)?;
    server::init_tracing(&config.logging)?;

    if from_file {
        tracing::info!("Loaded configuration from {}", path.display());
    } else {
        tracing::info!(
            "No configuration at {}, using defaults",
            path.display()
        );
    }

    server::run_server(config).await
}

/// Validate a configuration file and print the findings.
///
/// Any validation error is returned, so the process exits non-zero.
fn check_config_file(path: &std::path::Path) -> Result<(), ConfigError> {
    let config = ConfigLoader::load(path)?;
    let result = ConfigValidator::validate(&config);

    for warning in &result.warnings {
        println!("warning: {}: {}", warning.path, warning.message);
    }
    for error in &result.errors {
        println!("error: {}: {}", error.path, error.message);
    }

    if result.is_valid() {
        println!("{} is valid", path.display());
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field: path.display().to_string(),
            message: format!("{} error(s) found", result.errors.len()),
        })
    }
}
