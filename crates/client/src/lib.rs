//! Client code for go2web.
//!
//! This crate provides the raw-socket HTTP transport, content extraction, the
//! fetch/extract/cache pipeline and the search helper used by the CLI.

pub mod extract;
pub mod fetch;
pub mod pipeline;
pub mod search;

pub use extract::{LINKS_SEPARATOR, extract, extract_lines, parse_structured};

pub use fetch::{
    ContentKind, Fetcher, Headers, RawResponse, Scheme, Target, TargetError, Transport, TransportConfig, build_request,
};
pub use pipeline::{Opened, Pipeline, Source};
pub use search::{SearchConfig, SearchOutcome, filter_lines, search};
