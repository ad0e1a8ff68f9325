//! Draft files: a composition saved as JSON in the `/save_composition` body shape.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use composer_types::CompositionPayload;

/// Read and normalize a draft.
///
/// `after` records that carry an `expected_value` lose it, so a draft always
/// produces the same body the form would.
pub fn load_draft(path: &Path) -> Result<CompositionPayload> {
    let text = fs::read_to_string(path).with_context(|| format!("failed to read draft {}", path.display()))?;
    let payload: CompositionPayload =
        serde_json::from_str(&text).with_context(|| format!("draft {} is not a valid composition", path.display()))?;
    Ok(payload.normalized())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use composer_types::RelationKind;
    use tempfile::NamedTempFile;

    use super::*;

    fn draft_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_and_normalizes_a_draft() {
        let file = draft_file(
            r#"{
                "compositions": [
                    {"service_a": "flame_status", "relation": "on_value", "service_b": "activate_buzzer", "expected_value": "READY"},
                    {"service_a": "a", "relation": "after", "service_b": "b", "expected_value": "stale"}
                ],
                "interval": 5
            }"#,
        );

        let payload = load_draft(file.path()).unwrap();
        assert_eq!(payload.interval, Some(5));
        assert_eq!(payload.compositions[0].relation, RelationKind::OnValue);
        assert_eq!(payload.compositions[0].expected_value.as_deref(), Some("READY"));
        assert_eq!(payload.compositions[1].expected_value, None);
    }

    #[test]
    fn missing_interval_defaults_to_null() {
        let file = draft_file(r#"{"compositions": []}"#);
        let payload = load_draft(file.path()).unwrap();
        assert!(payload.compositions.is_empty());
        assert_eq!(payload.interval, None);
    }

    #[test]
    fn unknown_relation_is_rejected_with_context() {
        let file = draft_file(r#"{"compositions": [{"service_a": "a", "relation": "before", "service_b": "b"}]}"#);
        let error = load_draft(file.path()).unwrap_err();
        assert!(error.to_string().contains("is not a valid composition"), "{error}");
    }

    #[test]
    fn missing_file_reports_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let error = load_draft(&path).unwrap_err();
        assert!(error.to_string().contains("absent.json"), "{error}");
    }
}
