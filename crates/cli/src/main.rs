//! go2web entry point.
//!
//! Fetches a URL or searches a fixed page, printing results on stdout.
//! Logging goes to stderr so piped output only carries content.

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, ArgGroup, Parser};
use tracing_subscriber::EnvFilter;

use go2web_client::{Pipeline, SearchConfig, Transport, TransportConfig, search};
use go2web_core::{AppConfig, CacheDb};

mod output;

#[derive(Debug, Parser)]
#[command(
    name = "go2web",
    about = "Fetch web pages over raw sockets and print their readable content",
    version
)]
#[command(group(ArgGroup::new("action").required(true).args(["url", "search", "clear_cache"])))]
struct Cli {
    /// Fetch a URL and print its extracted content.
    #[arg(short = 'u', value_name = "URL")]
    url: Option<String>,

    /// Search the configured page; several words are joined with spaces.
    #[arg(short = 's', value_name = "TERM", num_args = 1..)]
    search: Option<Vec<String>>,

    /// Remove every cached entry.
    #[arg(long)]
    clear_cache: bool,

    /// Ignore cached entries and fetch again (the result is still cached).
    #[arg(short, long)]
    refresh: bool,

    /// Path to a TOML config file (default: ./go2web.toml if present).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, PartialEq, Eq)]
enum Action {
    Fetch(String),
    Search(String),
    ClearCache,
}

impl Cli {
    fn action(&self) -> Action {
        if let Some(url) = &self.url {
            Action::Fetch(url.clone())
        } else if let Some(words) = &self.search {
            Action::Search(words.join(" "))
        } else {
            Action::ClearCache
        }
    }
}

fn log_filter(verbosity: u8) -> EnvFilter {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    EnvFilter::new(format!("warn,go2web={level},go2web_core={level},go2web_client={level}"))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = AppConfig::load(cli.config.as_deref()).map_err(go2web_core::Error::from)?;
    let cache = CacheDb::open(&config.db_path).await?;
    let pipeline = Pipeline::new(&cache, Transport::new(TransportConfig::from(&config)));

    let mut stdout = std::io::stdout().lock();

    match cli.action() {
        Action::Fetch(url) => {
            let opened = pipeline.open(&url, cli.refresh).await?;
            output::write_opened(&mut stdout, &url, &opened)?;
        }
        Action::Search(term) => {
            let outcome = search(&pipeline, &SearchConfig::from(&config), &term, cli.refresh).await?;
            output::write_search(&mut stdout, &term, &outcome)?;
        }
        Action::ClearCache => {
            let removed = cache.clear().await?;
            output::write_cleared(&mut stdout, removed)?;
        }
    }

    Ok(())
}
