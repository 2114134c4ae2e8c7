//! SQLite-backed cache of extracted artifacts.
//!
//! This module provides a persistent cache keyed by URL fingerprint, using
//! SQLite with async access via tokio-rusqlite. It supports:
//!
//! - Fingerprinting URLs with SHA-256
//! - Automatic schema migrations
//! - Write-through upserts that are durable when they return
//! - Explicit eviction (single URL or everything)

pub mod artifacts;
pub mod connection;
pub mod hash;
pub mod migrations;

pub use crate::Error;

pub use connection::CacheDb;
pub use hash::fingerprint;
