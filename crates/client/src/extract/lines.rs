//! Flattening HTML documents into tagged lines.
//!
//! Each heading (h1-h3) and paragraph becomes one line, marked with asterisks
//! whose count drops with heading depth and a tag naming the element:
//!
//! ```text
//! *** [h1] Title
//! ** [h2] Section
//! * [h3] Subsection
//! * [p] Body text
//! -- Links --
//! https://example.com/
//! ```

use std::collections::HashSet;

use go2web_core::Error;
use scraper::{ElementRef, Html, Selector};

/// Line separating content lines from the trailing link list.
pub const LINKS_SEPARATOR: &str = "-- Links --";

const CONTENT_SELECTOR: &str = "h1, h2, h3, p";
const LINK_SELECTOR: &str = "a[href]";

/// Format a heading line; `level` is clamped to 1..=3.
pub fn heading_line(level: u8, text: &str) -> String {
    let level = level.clamp(1, 3);
    let marker = "*".repeat(usize::from(4 - level));
    format!("{marker} [h{level}] {text}")
}

pub fn paragraph_line(text: &str) -> String {
    format!("* [p] {text}")
}

fn parse_selector(selector: &str) -> Result<Selector, Error> {
    Selector::parse(selector).map_err(|e| Error::Parse(format!("invalid selector {selector:?}: {e:?}")))
}

/// Element text with whitespace runs collapsed to single spaces.
fn element_text(element: &ElementRef<'_>) -> String {
    let raw: String = element.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extract heading/paragraph lines and absolute links from an HTML document.
///
/// Lines follow document order. Elements with no text are skipped. Links keep
/// only `href`s starting with `http`, de-duplicated, after the separator line.
pub fn extract_lines(html: &str) -> Result<Vec<String>, Error> {
    let document = Html::parse_document(html);
    let content = parse_selector(CONTENT_SELECTOR)?;
    let anchors = parse_selector(LINK_SELECTOR)?;

    let mut lines = Vec::new();

    for element in document.select(&content) {
        let text = element_text(&element);
        if text.is_empty() {
            continue;
        }

        let line = match element.value().name() {
            "h1" => heading_line(1, &text),
            "h2" => heading_line(2, &text),
            "h3" => heading_line(3, &text),
            _ => paragraph_line(&text),
        };
        lines.push(line);
    }

    lines.push(LINKS_SEPARATOR.to_string());

    let mut seen = HashSet::new();
    for element in document.select(&anchors) {
        let Some(href) = element.value().attr("href").map(str::trim) else {
            continue;
        };

        if !href.starts_with("http") || !seen.insert(href.to_string()) {
            continue;
        }

        lines.push(href.to_string());
    }

    Ok(lines)
}
