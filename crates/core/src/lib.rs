//! Core types and shared functionality for go2web.
//!
//! This crate provides:
//! - Artifact cache with SQLite backend, keyed by URL fingerprint
//! - The [`Artifact`] type produced by extraction
//! - Unified error types
//! - Configuration structures

pub mod artifact;
pub mod cache;
pub mod config;
pub mod error;

pub use artifact::Artifact;
pub use cache::{CacheDb, fingerprint};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
