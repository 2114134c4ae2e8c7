//! Content extraction from raw HTTP responses.
//!
//! Dispatch is on the normalized `Content-Type` of the response:
//!
//! - JSON: the body is parsed and kept as structured data, rendered indented.
//! - HTML: the body becomes a flat list of tagged lines (headings, paragraphs)
//!   followed by the absolute links it contains.
//! - Anything else: the decoded response text is kept unchanged.
//!
//! A JSON body that fails to parse is an error and yields no artifact, so
//! nothing gets cached for it.

pub mod lines;
pub mod structured;

pub use lines::{LINKS_SEPARATOR, extract_lines, heading_line, paragraph_line};
pub use structured::parse_structured;

use go2web_core::{Artifact, Error};

use crate::fetch::{ContentKind, RawResponse};

/// Turn a raw response into the artifact that gets cached and displayed.
pub fn extract(response: &RawResponse) -> Result<Artifact, Error> {
    let kind = response.content_kind();
    tracing::debug!(status = ?response.status(), ?kind, "extracting response");

    match kind {
        ContentKind::Structured => parse_structured(response.body()).map(Artifact::Structured),
        ContentKind::Markup => extract_lines(response.body()).map(Artifact::Lines),
        ContentKind::Other => Ok(Artifact::Raw(response.text().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(content_type: &str, body: &str) -> RawResponse {
        let text = format!("HTTP/1.1 200 OK\r\nContent-Type: {content_type}\r\n\r\n{body}");
        RawResponse::from_bytes(text.as_bytes())
    }

    #[test]
    fn test_extract_markup() {
        let raw = response("text/html; charset=utf-8", r#"<h1>A</h1><p>B</p><a href="http://x">L</a>"#);
        let artifact = extract(&raw).unwrap();

        assert_eq!(
            artifact,
            Artifact::Lines(vec![
                "*** [h1] A".to_string(),
                "* [p] B".to_string(),
                LINKS_SEPARATOR.to_string(),
                "http://x".to_string(),
            ])
        );
    }

    #[test]
    fn test_extract_structured() {
        let raw = response("application/json", r#"{"a":1}"#);
        let artifact = extract(&raw).unwrap();

        assert!(matches!(artifact, Artifact::Structured(_)));
        assert!(artifact.to_string().contains("\"a\": 1"));
    }

    #[test]
    fn test_extract_malformed_structured() {
        let raw = response("application/json", r#"{"a":"#);
        let result = extract(&raw);
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_extract_other_keeps_raw_text() {
        let raw = response("text/plain", "<h1>not markup</h1>");
        let artifact = extract(&raw).unwrap();
        assert_eq!(artifact, Artifact::Raw(raw.text().to_string()));
    }

    #[test]
    fn test_extract_without_content_type() {
        let raw = RawResponse::from_bytes(b"HTTP/1.1 200 OK\r\n\r\n{\"a\":1}");
        let artifact = extract(&raw).unwrap();
        assert!(matches!(artifact, Artifact::Raw(_)));
    }

    #[test]
    fn test_extract_is_deterministic() {
        let raw = response("text/html", "<h2>Title</h2><p>one</p><p>two</p><a href='https://a.example/'>a</a>");
        let first = serde_json::to_string(&extract(&raw).unwrap()).unwrap();
        let second = serde_json::to_string(&extract(&raw).unwrap()).unwrap();
        assert_eq!(first, second);
    }
}
