//! Rendering results for the terminal.

use std::io::{self, Write};

use go2web_client::{Opened, SearchOutcome, Source};

pub fn write_opened(out: &mut impl Write, url: &str, opened: &Opened) -> io::Result<()> {
    let origin = match opened.source {
        Source::Cache => " (cached)",
        Source::Network => "",
    };
    writeln!(out, "Response from {url}{origin}:")?;
    writeln!(out, "{}", opened.artifact)
}

pub fn write_search(out: &mut impl Write, term: &str, outcome: &SearchOutcome) -> io::Result<()> {
    match outcome {
        SearchOutcome::Matches(lines) => {
            for (i, line) in lines.iter().enumerate() {
                writeln!(out, "{:>2}. {line}", i + 1)?;
            }
            Ok(())
        }
        SearchOutcome::NoMatch => writeln!(out, "No matches for \"{term}\""),
    }
}

pub fn write_cleared(out: &mut impl Write, removed: u64) -> io::Result<()> {
    let noun = if removed == 1 { "entry" } else { "entries" };
    writeln!(out, "Removed {removed} cached {noun}")
}
