//! Worker configuration: one TOML file plus environment-sourced
//! credentials, loaded once at process start and passed explicitly into the
//! collaborators that need them. No ambient globals.

use std::path::Path;
use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading configuration or credentials.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Path that was attempted.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for the expected schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// An environment variable required by the application is not set.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
}

/// Worker settings parsed from the TOML config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Work-queue endpoint the worker polls for analysis jobs.
    pub queue_url: String,

    /// Notification endpoint alerts are published to.
    pub notify_url: String,

    /// Seconds to pause between processed jobs.
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,

    /// Minimum spacing between dividend-list page requests, in seconds.
    #[serde(default = "default_page_period_secs")]
    pub page_period_secs: u64,

    /// Business days on either side of the record date in each candle window.
    #[serde(default = "default_window_days")]
    pub window_days: i64,
}

fn default_cooldown_secs() -> u64 {
    60
}

fn default_page_period_secs() -> u64 {
    12
}

fn default_window_days() -> i64 {
    4
}

impl Config {
    /// Parses a config from a TOML string.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Reads and parses the config file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::Read {
            path: path.as_ref().display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Pause between processed jobs.
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }

    /// Spacing between dividend-list page requests.
    pub fn page_period(&self) -> Duration {
        Duration::from_secs(self.page_period_secs)
    }
}

/// Upstream API credentials, fetched once at process start. No rotation.
#[derive(Debug)]
pub struct Secrets {
    /// Alpaca key id.
    pub alpaca_key: SecretString,
    /// Alpaca secret key.
    pub alpaca_secret: SecretString,
    /// Polygon API key.
    pub polygon_key: SecretString,
}

impl Secrets {
    /// Reads all three keys from `ALPACA_KEY`, `ALPACA_SECRET` and
    /// `POLYGON_KEY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            alpaca_key: get_env_var("ALPACA_KEY")?.into(),
            alpaca_secret: get_env_var("ALPACA_SECRET")?.into(),
            polygon_key: get_env_var("POLYGON_KEY")?.into(),
        })
    }
}

/// Reads an environment variable, returning a structured error if it's
/// missing.
fn get_env_var(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}
