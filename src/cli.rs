//! Command-line interface for highlow.

use clap::{Parser, Subcommand};

/// highlow - multi-deck higher/lower card game client
#[derive(Parser, Debug)]
#[command(name = "highlow")]
#[command(about = "Terminal client for the multi-deck higher/lower card game", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start a game and play it from the keyboard
    Play {
        /// Path to the client config file
        #[arg(short, long, default_value = highlow::DEFAULT_CONFIG_FILE)]
        config: std::path::PathBuf,

        /// Override the engine base URL
        #[arg(long)]
        engine_url: Option<String>,

        /// Override the statistics service base URL
        #[arg(long)]
        stats_url: Option<String>,

        /// Number of decks to deal (6-10)
        #[arg(short, long, default_value = "6")]
        decks: usize,
    },

    /// Check the engine's health endpoint
    Health {
        /// Path to the client config file
        #[arg(short, long, default_value = highlow::DEFAULT_CONFIG_FILE)]
        config: std::path::PathBuf,

        /// Override the engine base URL
        #[arg(long)]
        engine_url: Option<String>,
    },
}
