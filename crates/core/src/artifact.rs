//! Post-extraction representation of a fetched resource.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The cached result of fetching and extracting one URL.
///
/// Which variant a response becomes is decided by the extractor from the
/// response's declared content type; the cache stores whichever it is given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Artifact {
    /// Decoded response text, unchanged.
    Raw(String),
    /// Annotated lines extracted from a markup document, in document order.
    Lines(Vec<String>),
    /// Parsed structured data.
    Structured(serde_json::Value),
}

impl Artifact {
    /// Short tag stored next to the encoded artifact.
    pub fn kind(&self) -> &'static str {
        match self {
            Artifact::Raw(_) => "raw",
            Artifact::Lines(_) => "lines",
            Artifact::Structured(_) => "structured",
        }
    }

    /// Flatten the artifact into display lines.
    ///
    /// Structured data is rendered pretty-printed first, so every variant can be
    /// filtered line by line.
    pub fn lines(&self) -> Vec<String> {
        match self {
            Artifact::Lines(lines) => lines.clone(),
            other => other.to_string().lines().map(str::to_string).collect(),
        }
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Artifact::Raw(text) => f.write_str(text),
            Artifact::Lines(lines) => f.write_str(&lines.join("\n")),
            Artifact::Structured(value) => {
                let pretty = serde_json::to_string_pretty(value).map_err(|_| fmt::Error)?;
                f.write_str(&pretty)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_renders_indented() {
        let artifact = Artifact::Structured(serde_json::json!({"a": 1}));
        let rendered = artifact.to_string();
        assert!(rendered.contains("\"a\": 1"));
        assert!(rendered.contains('\n'));
    }

    #[test]
    fn test_lines_join() {
        let artifact = Artifact::Lines(vec!["*** [h1] A".into(), "* [p] B".into()]);
        assert_eq!(artifact.to_string(), "*** [h1] A\n* [p] B");
        assert_eq!(artifact.lines().len(), 2);
    }

    #[test]
    fn test_raw_lines_split() {
        let artifact = Artifact::Raw("HTTP/1.1 200 OK\r\nServer: x\r\n\r\nbody".into());
        assert_eq!(artifact.lines(), vec!["HTTP/1.1 200 OK", "Server: x", "", "body"]);
    }

    #[test]
    fn test_kind_tags() {
        assert_eq!(Artifact::Raw(String::new()).kind(), "raw");
        assert_eq!(Artifact::Lines(Vec::new()).kind(), "lines");
        assert_eq!(Artifact::Structured(serde_json::Value::Null).kind(), "structured");
    }

    #[test]
    fn test_serde_tagging() {
        let json = serde_json::to_string(&Artifact::Lines(vec!["x".into()])).unwrap();
        assert_eq!(json, r#"{"kind":"lines","value":["x"]}"#);
    }
}
