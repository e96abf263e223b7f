//! Application configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use overtoe_core::AiConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Settings read from `overtoe.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite database file.
    #[serde(default = "default_db_path")]
    db_path: String,

    /// Out of 10 Medium AI turns, how many play the optimal move.
    #[serde(default = "default_medium_optimal_in_ten")]
    medium_optimal_in_ten: u8,
}

fn default_db_path() -> String {
    "overtoe.db".to_string()
}

fn default_medium_optimal_in_ten() -> u8 {
    *AiConfig::default().medium_optimal_in_ten()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            medium_optimal_in_ten: default_medium_optimal_in_ten(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        if config.medium_optimal_in_ten > 10 {
            return Err(ConfigError::new(format!(
                "medium_optimal_in_ten must be 0-10, got {}",
                config.medium_optimal_in_ten
            )));
        }
        info!(db_path = %config.db_path, "Config loaded");
        Ok(config)
    }

    /// Loads `path` if it exists, defaults otherwise.
    ///
    /// `OVERTOE_DB` in the environment replaces the database path.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut config = if path.as_ref().exists() {
            Self::from_file(path)?
        } else {
            debug!("No config file, using defaults");
            Self::default()
        };
        if let Ok(db_path) = std::env::var("OVERTOE_DB") {
            debug!(%db_path, "Database path from environment");
            config.db_path = db_path;
        }
        Ok(config)
    }

    /// Replaces the database path.
    pub fn with_db_path(mut self, db_path: String) -> Self {
        self.db_path = db_path;
        self
    }

    /// Engine tuning derived from this config.
    pub fn ai_config(&self) -> AiConfig {
        AiConfig::new(self.medium_optimal_in_ten)
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
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
