//! Unified error types for go2web.
//!
//! Every failure the pipeline can surface maps onto one of these variants, and
//! the display string leads with a stable code so the CLI can print it as-is.

use tokio_rusqlite::rusqlite;

use crate::config::ConfigError;

/// Unified error type for fetching, extraction and caching.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed or unsupported URL, or invalid configuration.
    #[error("CONFIGURATION_ERROR: {0}")]
    Configuration(String),

    /// DNS, connect, TLS or read failure, including a timeout with no data.
    #[error("CONNECTION_ERROR: {0}")]
    Connection(String),

    /// Response grew past the configured byte limit.
    #[error("FETCH_TOO_LARGE: {0}")]
    TooLarge(String),

    /// Response body or head could not be parsed.
    #[error("PARSE_ERROR: {0}")]
    Parse(String),

    /// No cache entry for the given URL.
    #[error("NOT_FOUND: {0}")]
    NotFound(String),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NotFound("https://example.com/".to_string());
        assert!(err.to_string().starts_with("NOT_FOUND"));
        assert!(err.to_string().contains("https://example.com/"));
    }

    #[test]
    fn test_config_error_becomes_configuration() {
        let err: Error = ConfigError::Invalid { field: "max_bytes".into(), reason: "must be greater than 0".into() }.into();
        assert!(matches!(err, Error::Configuration(ref msg) if msg.contains("max_bytes")));
    }
}
