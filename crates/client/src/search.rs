//! Substring search over the extracted lines of a fixed page.

use go2web_core::{AppConfig, Error};

use crate::extract::LINKS_SEPARATOR;
use crate::fetch::Fetcher;
use crate::pipeline::Pipeline;

/// Configuration for search mode.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Page whose lines are searched
    pub url: String,

    /// Maximum number of matches returned (default: 10)
    pub limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        let app = AppConfig::default();
        Self { url: app.search_url, limit: app.search_limit }
    }
}

impl From<&AppConfig> for SearchConfig {
    fn from(config: &AppConfig) -> Self {
        Self { url: config.search_url.clone(), limit: config.search_limit }
    }
}

/// Result of a search that managed to fetch its page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Matching lines in page order, at most `limit` of them.
    Matches(Vec<String>),
    /// The page was read but no line contains the term.
    NoMatch,
}

/// Keep lines containing `term`, ignoring case, preserving order.
///
/// The links separator is never a match.
pub fn filter_lines(lines: &[String], term: &str, limit: usize) -> Vec<String> {
    let needle = term.to_lowercase();
    lines
        .iter()
        .filter(|line| line.as_str() != LINKS_SEPARATOR)
        .filter(|line| line.to_lowercase().contains(&needle))
        .take(limit)
        .cloned()
        .collect()
}

/// Search the configured page for `term`.
///
/// The page goes through the normal pipeline, so a cached extraction is reused.
///
/// # Errors
///
/// A blank term is a configuration error. Fetch and extraction failures are
/// returned as errors, never as an empty match list.
pub async fn search<F: Fetcher>(
    pipeline: &Pipeline<'_, F>, config: &SearchConfig, term: &str, refresh: bool,
) -> Result<SearchOutcome, Error> {
    let term = term.trim();
    if term.is_empty() {
        return Err(Error::Configuration("search term must not be empty".into()));
    }

    let lines = pipeline.lines(&config.url, refresh).await?;
    let matches = filter_lines(&lines, term, config.limit);

    tracing::debug!(term, scanned = lines.len(), matched = matches.len(), "search finished");

    if matches.is_empty() { Ok(SearchOutcome::NoMatch) } else { Ok(SearchOutcome::Matches(matches)) }
}
