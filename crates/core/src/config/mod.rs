//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment:
//!
//! 1. TOML config file (`./go2web.toml`, or an explicit path)
//! 2. Built-in defaults
//!
//! No environment variables are consulted.

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "go2web.toml";

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. TOML config file
/// 2. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to SQLite cache database.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// TCP connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Idle-read timeout in milliseconds.
    ///
    /// When no bytes arrive for this long the response is considered complete.
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,

    /// Maximum bytes to accumulate per response.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Page fetched by search mode.
    #[serde(default = "default_search_url")]
    pub search_url: String,

    /// Maximum number of matching lines returned by search mode.
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./go2web-cache.sqlite")
}

fn default_connect_timeout_ms() -> u64 {
    5_000
}

fn default_read_timeout_ms() -> u64 {
    2_000
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_search_url() -> String {
    "https://news.ycombinator.com/".into()
}

fn default_search_limit() -> usize {
    10
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            connect_timeout_ms: default_connect_timeout_ms(),
            read_timeout_ms: default_read_timeout_ms(),
            max_bytes: default_max_bytes(),
            search_url: default_search_url(),
            search_limit: default_search_limit(),
        }
    }
}

impl AppConfig {
    /// Connect timeout as Duration for use with tokio.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Idle-read timeout as Duration for use with tokio.
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Load configuration from defaults and an optional TOML file.
    ///
    /// With `path` set, the file must exist. Without it, `./go2web.toml` is
    /// merged only if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - An explicit configuration file does not exist
    /// - The file cannot be parsed
    /// - Validation fails after loading
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::LoadFailed(format!("config file not found: {}", path.display())));
                }
                figment = figment.merge(Toml::file(path));
            }
            None => {
                figment = figment.merge(Toml::file(DEFAULT_CONFIG_FILE));
            }
        }

        Self::from_figment(figment)
    }

    /// Load configuration from a TOML string layered over the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the string cannot be parsed or validation fails.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Self::from_figment(Figment::from(Serialized::defaults(Self::default())).merge(Toml::string(toml)))
    }

    fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        tracing::debug!(db_path = %config.db_path.display(), search_url = %config.search_url, "configuration loaded");

        Ok(config)
    }
}
