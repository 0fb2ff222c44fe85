//! TOML configuration for the boardwalk server: identity, storage location,
//! logging, and the default rule set new games start from.
//!
//! Loaded with [`Config::load`]; `boardwalk init` writes the default file
//! via [`Config::create_default`]. Every field carries a serde default so a
//! partial file still parses, and [`Config::validate`] rejects values the
//! engine cannot run with.
//!
//! ```toml
//! [server]
//! name = "Boardwalk"
//!
//! [storage]
//! data_dir = "./data"
//!
//! [logging]
//! level = "info"
//!
//! [rules]
//! starting_cash = 1500
//! max_players = 8
//! ```

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::game::types::GameRules;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_server_name")]
    pub name: String,
}

fn default_server_name() -> String {
    "Boardwalk".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    "./data".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional log file; stderr only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Defaults handed to every newly created game; hosts adjust per game
    /// through the settings gate afterwards.
    #[serde(default)]
    pub rules: GameRules,
}

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

impl Config {
    /// Load and validate configuration from a TOML file.
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("failed to read config file {}: {}", path, e))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("failed to parse config file {}: {}", path, e))?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default configuration file.
    pub async fn create_default(path: &str) -> Result<()> {
        let content = toml::to_string_pretty(&Config::default())
            .map_err(|e| anyhow!("failed to serialize default config: {}", e))?;
        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("failed to write config file {}: {}", path, e))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.name.trim().is_empty() {
            return Err(anyhow!("server.name must not be empty"));
        }
        if self.storage.data_dir.trim().is_empty() {
            return Err(anyhow!("storage.data_dir must not be empty"));
        }
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(anyhow!(
                "logging.level must be one of {:?}, got '{}'",
                LOG_LEVELS,
                self.logging.level
            ));
        }
        if self.rules.starting_cash <= 0 {
            return Err(anyhow!("rules.starting_cash must be positive"));
        }
        if self.rules.max_players < 2 {
            return Err(anyhow!("rules.max_players must be at least 2"));
        }
        Ok(())
    }
}
