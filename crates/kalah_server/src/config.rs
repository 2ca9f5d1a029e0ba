//! Server configuration.
//!
//! Values come from an optional TOML file, then `KALAH_*` environment
//! variables, then command-line flags, each layer overriding the last.

use derive_getters::Getters;
use derive_more::{Display, Error};
use kalah_core::{Rules, TieBreak};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, instrument};

/// Configuration for the Kalah game server.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Stones placed in every pit of a new game.
    initial_stones: u32,

    /// Prefix of the game URL returned to clients; the game id is appended.
    base_url: String,

    /// SQLite database file.
    db_path: String,

    /// Host to bind to.
    host: String,

    /// Port to bind to.
    port: u16,

    /// How level houses are scored.
    tie_break: TieBreak,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            initial_stones: 6,
            base_url: "http://localhost:3000/games/".to_string(),
            db_path: "kalah.db".to_string(),
            host: "127.0.0.1".to_string(),
            port: 3000,
            tie_break: TieBreak::default(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from TOML text. Missing keys take defaults.
    #[instrument(skip(content))]
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Builds the effective configuration: file (if any), then the process
    /// environment, then validation.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        info!(
            initial_stones = config.initial_stones,
            tie_break = %config.tie_break,
            db_path = %config.db_path,
            "Config loaded"
        );
        Ok(config)
    }

    /// Overrides fields from `KALAH_*` variables found by `lookup`.
    #[instrument(skip(self, lookup))]
    pub fn apply_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(value) = lookup("KALAH_INITIAL_STONES") {
            self.initial_stones = parse_env("KALAH_INITIAL_STONES", &value)?;
        }
        if let Some(value) = lookup("KALAH_BASE_URL") {
            self.base_url = value;
        }
        if let Some(value) = lookup("KALAH_DB_PATH") {
            self.db_path = value;
        }
        if let Some(value) = lookup("KALAH_HOST") {
            self.host = value;
        }
        if let Some(value) = lookup("KALAH_PORT") {
            self.port = parse_env("KALAH_PORT", &value)?;
        }
        if let Some(value) = lookup("KALAH_TIE_BREAK") {
            self.tie_break = parse_env("KALAH_TIE_BREAK", &value)?;
        }
        Ok(self)
    }

    /// Overrides the listen address from command-line flags.
    pub fn with_listen(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    /// Checks values that parse but cannot be played.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_stones == 0 {
            return Err(ConfigError::new(
                "initial_stones must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Rules implied by this configuration.
    pub fn rules(&self) -> Rules {
        Rules::new(self.tie_break)
    }
}

#[track_caller]
fn parse_env<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| ConfigError::new(format!("Invalid {}='{}': {}", key, value, e)))
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
