//! Raw HTTP response text, head parsing and framing.

use std::collections::HashMap;

const CRLF_SEPARATOR: &str = "\r\n\r\n";
const LF_SEPARATOR: &str = "\n\n";

/// How the extractor should treat a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// JSON and `+json` media types.
    Structured,
    /// HTML and XHTML.
    Markup,
    /// Anything else, including a missing `Content-Type`.
    Other,
}

impl ContentKind {
    /// Classify a normalized media type token (see [`Headers::content_type`]).
    pub fn from_media_type(media_type: &str) -> Self {
        match media_type {
            "application/json" | "text/json" => ContentKind::Structured,
            t if t.ends_with("+json") => ContentKind::Structured,
            "text/html" | "application/xhtml+xml" => ContentKind::Markup,
            _ => ContentKind::Other,
        }
    }
}

/// Response header map with lower-cased names.
///
/// Repeated headers keep the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: HashMap<String, String>,
}

impl Headers {
    /// Parse the header lines of a response head.
    ///
    /// The first line (status line) is skipped; lines without a colon are ignored.
    pub fn parse(head: &str) -> Self {
        let entries = head
            .lines()
            .skip(1)
            .filter_map(|line| line.split_once(':'))
            .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_string()))
            .collect();
        Self { entries }
    }

    /// Look up a header by case-insensitive name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Media type from `Content-Type`, without parameters, lower-cased.
    pub fn content_type(&self) -> Option<String> {
        self.get("content-type")
            .and_then(|v| v.split(';').next())
            .map(|t| t.trim().to_ascii_lowercase())
            .filter(|t| !t.is_empty())
    }

    /// Declared body length, if present and numeric.
    pub fn content_length(&self) -> Option<usize> {
        self.get("content-length").and_then(|v| v.parse().ok())
    }

}

/// Full decoded response: status line, headers, separator, body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    text: String,
}

impl RawResponse {
    /// Decode accumulated bytes, replacing invalid UTF-8 rather than failing.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self { text: String::from_utf8_lossy(bytes).into_owned() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Split into head and body at the first blank line.
    ///
    /// Without a separator the whole text is treated as head.
    pub fn split(&self) -> (&str, &str) {
        split_head(&self.text)
    }

    pub fn head(&self) -> &str {
        self.split().0
    }

    pub fn body(&self) -> &str {
        self.split().1
    }

    pub fn status_line(&self) -> Option<&str> {
        self.text.lines().next().filter(|line| line.starts_with("HTTP/"))
    }

    /// Numeric status code from the status line.
    pub fn status(&self) -> Option<u16> {
        self.status_line()?.split_whitespace().nth(1)?.parse().ok()
    }

    pub fn headers(&self) -> Headers {
        Headers::parse(self.head())
    }

    pub fn content_kind(&self) -> ContentKind {
        self.headers()
            .content_type()
            .map(|t| ContentKind::from_media_type(&t))
            .unwrap_or(ContentKind::Other)
    }
}

fn split_head(text: &str) -> (&str, &str) {
    match head_end(text.as_bytes(), 0) {
        Some((end, body_start)) => (&text[..end], &text[body_start..]),
        None => (text, ""),
    }
}

/// Locate the earliest blank line at or after `from`.
///
/// Returns where the head ends and where the body begins. CRLF and bare LF
/// separators are both accepted, whichever comes first.
fn head_end(buf: &[u8], from: usize) -> Option<(usize, usize)> {
    (from..buf.len()).find_map(|i| {
        let rest = &buf[i..];
        if rest.starts_with(CRLF_SEPARATOR.as_bytes()) {
            Some((i, i + CRLF_SEPARATOR.len()))
        } else if rest.starts_with(LF_SEPARATOR.as_bytes()) {
            Some((i, i + LF_SEPARATOR.len()))
        } else {
            None
        }
    })
}

/// What the bytes received so far say about where the response ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Framing {
    /// The head has not fully arrived yet.
    Incomplete,
    /// The response is exactly this many bytes long.
    Length(usize),
    /// Only connection close or the idle timeout can end the response.
    Unbounded,
}

/// Inspect the head of a partially received response.
///
/// The separator search starts at `scan_from`, so a caller feeding the buffer
/// chunk by chunk only rescans the bytes that could complete a separator.
/// A length is known when the head carries `Content-Length` or the status
/// forbids a body (1xx, 204, 304). A declared length too large to address
/// saturates to `usize::MAX`.
pub(crate) fn framing(buf: &[u8], scan_from: usize) -> Framing {
    let Some((_, body_start)) = head_end(buf, scan_from) else {
        return Framing::Incomplete;
    };
    let head = String::from_utf8_lossy(&buf[..body_start]);

    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|code| code.parse::<u16>().ok());
    if matches!(status, Some(100..=199 | 204 | 304)) {
        return Framing::Length(body_start);
    }

    match Headers::parse(&head).content_length() {
        Some(len) => Framing::Length(body_start.saturating_add(len)),
        None => Framing::Unbounded,
    }
}
