//! Strict JSON parsing of response bodies with a readable failure preview.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

const BODY_PREVIEW_LIMIT: usize = 200;

/// Parse a response body as JSON, failing with a truncated body preview.
pub fn parse_response_json_strict(text: &str, status: Option<StatusCode>) -> Result<Value, JsonParseError> {
    serde_json::from_str::<Value>(text).map_err(|error| {
        let status_note = status
            .map(|code| format!("status {code}"))
            .unwrap_or_else(|| "unknown status".to_string());
        JsonParseError::new(status_note, error, truncate_response_preview(text, BODY_PREVIEW_LIMIT))
    })
}

/// Collapse whitespace and cut `text` to roughly `limit` bytes for log and UI output.
pub fn truncate_response_preview(text: &str, limit: usize) -> String {
    if text.trim().is_empty() {
        return "<empty>".to_string();
    }

    let mut preview = String::new();
    for ch in text.chars() {
        if preview.len() >= limit {
            preview.push_str("...");
            break;
        }
        match ch {
            '\n' | '\r' | '\t' => {
                if !preview.ends_with(' ') {
                    preview.push(' ');
                }
            }
            _ => preview.push(ch),
        }
    }

    preview.trim().to_string()
}

/// Error returned when strict JSON parsing of an HTTP response fails.
#[derive(Debug, Error)]
#[error("failed to parse JSON response ({status_note}): {source}. body preview: {body_preview}")]
pub struct JsonParseError {
    status_note: String,
    #[source]
    source: serde_json::Error,
    body_preview: String,
}

impl JsonParseError {
    pub fn new(status_note: String, source: serde_json::Error, body_preview: String) -> Self {
        Self {
            status_note,
            source,
            body_preview,
        }
    }

    /// Access the truncated response preview captured during parsing.
    pub fn body_preview(&self) -> &str {
        &self.body_preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_collapses_whitespace_and_truncates() {
        assert_eq!(truncate_response_preview("  \n ", 10), "<empty>");
        assert_eq!(truncate_response_preview("a\n\n\tb", 10), "a b");
        let long = "x".repeat(50);
        assert_eq!(truncate_response_preview(&long, 10), format!("{}...", "x".repeat(10)));
    }

    #[test]
    fn parse_error_reports_status_and_preview() {
        let error = parse_response_json_strict("<html>oops</html>", Some(StatusCode::OK)).unwrap_err();
        assert_eq!(error.body_preview(), "<html>oops</html>");
        assert!(error.to_string().contains("status 200 OK"), "{error}");
    }
}
