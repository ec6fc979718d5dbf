//! Client configuration.

use crate::controller::SessionSettings;
use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "highlow.toml";

/// Endpoints, timings and hint budget for the client.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_", into)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the game engine API.
    engine_url: String,

    /// Base URL of the statistics service.
    stats_url: String,

    /// Delay between flip and commit, in milliseconds.
    presentation_delay_ms: u64,

    /// How long the win celebration stays up, in milliseconds.
    celebration_ms: u64,

    /// Hints per session.
    hint_budget: u32,

    /// Resolved guesses a hint stays visible for.
    hint_window: u32,

    /// Wait before the single health retry, in milliseconds.
    health_retry_delay_ms: u64,

    /// Per-request timeout, in seconds.
    request_timeout_secs: u64,
}

fn default_engine_url() -> String {
    "http://localhost:8081/api/game".to_string()
}

fn default_stats_url() -> String {
    "http://localhost:8080".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            engine_url: default_engine_url(),
            stats_url: default_stats_url(),
            presentation_delay_ms: 800,
            celebration_ms: 5000,
            hint_budget: crate::hints::DEFAULT_HINT_BUDGET,
            hint_window: crate::hints::DEFAULT_HINT_WINDOW,
            health_retry_delay_ms: 2000,
            request_timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(engine_url = %config.engine_url, "Config loaded successfully");
        Ok(config)
    }

    /// Loads the file if it exists, otherwise returns defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Controller timings and budget.
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings::new(
            Duration::from_millis(self.presentation_delay_ms),
            Duration::from_millis(self.celebration_ms),
            self.hint_budget,
            self.hint_window,
        )
    }

    /// Wait before retrying the health check.
    pub fn health_retry_delay(&self) -> Duration {
        Duration::from_millis(self.health_retry_delay_ms)
    }

    /// Per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
