//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from files or defaults.

use crate::config::AppConfig;
use thiserror::Error;
use url::Url;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

const MIN_TIMEOUT_MS: u64 = 100;
const MAX_TIMEOUT_MS: u64 = 300_000;

fn check_timeout(field: &str, value: u64) -> Result<(), ConfigError> {
    if value < MIN_TIMEOUT_MS {
        return Err(ConfigError::Invalid { field: field.into(), reason: "must be at least 100ms".into() });
    }
    if value > MAX_TIMEOUT_MS {
        return Err(ConfigError::Invalid {
            field: field.into(),
            reason: "must not exceed 5 minutes (300000ms)".into(),
        });
    }
    Ok(())
}

fn check_search_url(value: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid { field: "search_url".into(), reason };

    let parsed = Url::parse(value).map_err(|e| invalid(format!("not a valid URL: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid("must be an http:// or https:// URL".into()));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(invalid("must include a host".into()));
    }
    Ok(())
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `db_path` is empty
    /// - either timeout is below 100ms or above 5 minutes
    /// - `max_bytes` is 0 or exceeds 50MB
    /// - `search_url` is not an http(s) URL with a host
    /// - `search_limit` is 0 or exceeds 100
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.db_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid { field: "db_path".into(), reason: "must not be empty".into() });
        }

        check_timeout("connect_timeout_ms", self.connect_timeout_ms)?;
        check_timeout("read_timeout_ms", self.read_timeout_ms)?;

        if self.max_bytes == 0 {
            return Err(ConfigError::Invalid { field: "max_bytes".into(), reason: "must be greater than 0".into() });
        }
        if self.max_bytes > 50 * 1024 * 1024 {
            return Err(ConfigError::Invalid { field: "max_bytes".into(), reason: "must not exceed 50MB".into() });
        }

        check_search_url(&self.search_url)?;

        if self.search_limit == 0 || self.search_limit > 100 {
            return Err(ConfigError::Invalid { field: "search_limit".into(), reason: "must be between 1 and 100".into() });
        }

        if self.read_timeout_ms > self.connect_timeout_ms * 10 {
            tracing::warn!(
                read_timeout_ms = self.read_timeout_ms,
                connect_timeout_ms = self.connect_timeout_ms,
                "read_timeout_ms is much larger than connect_timeout_ms; \
                 responses from servers that keep connections open will be slow"
            );
        }

        Ok(())
    }
}
