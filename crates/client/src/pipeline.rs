//! Fetch, extract and cache a URL.
//!
//! A cached artifact short-circuits the network entirely. On a miss the
//! response is fetched, extracted and written through to the cache before it
//! is returned. A failed extraction writes nothing, and neither does a
//! response without a 2xx status.

use go2web_core::{Artifact, CacheDb, Error};

use crate::extract::extract;
use crate::fetch::{Fetcher, Target, Transport};

/// Where an artifact came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Cache,
    Network,
}

/// Result of opening a URL.
#[derive(Debug, Clone, PartialEq)]
pub struct Opened {
    pub artifact: Artifact,
    pub source: Source,
}

/// The fetch/extract/cache pipeline.
///
/// The cache handle is borrowed so the caller decides its lifetime and every
/// component sees the same store.
pub struct Pipeline<'a, F = Transport> {
    cache: &'a CacheDb,
    fetcher: F,
}

impl<'a, F: Fetcher> Pipeline<'a, F> {
    pub fn new(cache: &'a CacheDb, fetcher: F) -> Self {
        Self { cache, fetcher }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Open a URL, serving from cache unless `refresh` is set.
    ///
    /// The URL is decomposed first so a bad scheme fails before the cache or
    /// network is touched. The cache key is the URL string exactly as given.
    pub async fn open(&self, url: &str, refresh: bool) -> Result<Opened, Error> {
        let target = Target::parse(url)?;

        if !refresh && self.cache.contains(url).await? {
            tracing::info!("retrieving cached response: {url}");
            let artifact = self.cache.get(url).await?;
            return Ok(Opened { artifact, source: Source::Cache });
        }

        let response = self.fetcher.fetch(&target).await?;
        let artifact = extract(&response)?;

        match response.status() {
            Some(200..=299) => self.cache.put(url, &artifact).await?,
            status => tracing::info!(?status, "not caching unsuccessful response: {url}"),
        }

        Ok(Opened { artifact, source: Source::Network })
    }

    /// Open a URL and flatten the artifact into display lines.
    pub async fn lines(&self, url: &str, refresh: bool) -> Result<Vec<String>, Error> {
        Ok(self.open(url, refresh).await?.artifact.lines())
    }
}
