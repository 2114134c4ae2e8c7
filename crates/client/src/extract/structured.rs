//! Structured-data (JSON) bodies.

use go2web_core::Error;

/// Parse a response body as JSON.
///
/// Surrounding whitespace is ignored; anything else that is not a single JSON
/// value is a parse error.
pub fn parse_structured(body: &str) -> Result<serde_json::Value, Error> {
    serde_json::from_str(body.trim()).map_err(|e| Error::Parse(format!("invalid JSON body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object() {
        let value = parse_structured("{\"a\":1}\r\n").unwrap();
        assert_eq!(value, serde_json::json!({"a": 1}));
    }

    #[test]
    fn test_parse_array() {
        let value = parse_structured("[1, 2, 3]").unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn test_parse_truncated() {
        assert!(matches!(parse_structured("{\"a\":"), Err(Error::Parse(_))));
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(parse_structured(""), Err(Error::Parse(_))));
    }
}
