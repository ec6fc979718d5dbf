//! highlow - terminal client
//!
//! Plays the multi-deck higher/lower game against a remote engine.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use highlow::ClientConfig;
use std::path::Path;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,highlow=debug";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            config,
            engine_url,
            stats_url,
            decks,
        } => {
            initialize_file_tracing()?;
            let config = load_config(&config, engine_url, stats_url)?;
            highlow::play(&config, decks).await
        }
        Command::Health { config, engine_url } => {
            initialize_stderr_tracing();
            let config = load_config(&config, engine_url, None)?;
            highlow::health(&config).await
        }
    }
}

#[instrument(skip(path), fields(path = %path.display()))]
fn load_config(
    path: &Path,
    engine_url: Option<String>,
    stats_url: Option<String>,
) -> Result<ClientConfig> {
    let mut config = ClientConfig::load(path)?;

    if let Some(url) = engine_url {
        info!(url = %url, "Overriding engine URL");
        config = config.with_engine_url(url);
    }
    if let Some(url) = stats_url {
        info!(url = %url, "Overriding statistics URL");
        config = config.with_stats_url(url);
    }

    Ok(config)
}

/// Logs go to a file so they don't interleave with the game output.
fn initialize_file_tracing() -> Result<()> {
    let log_file = std::fs::File::create("highlow.log")?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init();

    info!("Tracing initialized");
    Ok(())
}

fn initialize_stderr_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
