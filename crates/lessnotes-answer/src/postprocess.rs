//! Model-output post-processing.

use serde::{Deserialize, Serialize};

/// The structured shape the answer prompt asks the model to return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelAnswer {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<String>,
}

/// Normalize a model answer.
///
/// Parsed JSON answers get each source stripped of everything up to and
/// including the path marker, then are re-serialized. Output that does not
/// parse is returned verbatim; the caller always gets something back.
pub fn postprocess(raw: &str, source_marker: &str) -> String {
    match serde_json::from_str::<ModelAnswer>(raw.trim()) {
        Ok(mut parsed) => {
            for source in &mut parsed.sources {
                *source = normalize_source(source, source_marker);
            }
            serde_json::to_string(&parsed).unwrap_or_else(|_| raw.to_string())
        }
        Err(_) => raw.to_string(),
    }
}

fn normalize_source(source: &str, marker: &str) -> String {
    match source.find(marker) {
        Some(index) => source[index + marker.len()..].to_string(),
        None => source.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sources_stripped_through_marker() {
        let raw = r#"{"answer": "The sky is blue.", "sources": ["/home/ana/files/7/data/notes.txt"]}"#;
        let result = postprocess(raw, "data/");

        let parsed: ModelAnswer = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed.answer, "The sky is blue.");
        assert_eq!(parsed.sources, vec!["notes.txt".to_string()]);
    }

    #[test]
    fn test_source_without_marker_kept_as_is() {
        let raw = r#"{"answer": "ok", "sources": ["notes.txt"]}"#;
        let result = postprocess(raw, "data/");

        let parsed: ModelAnswer = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed.sources, vec!["notes.txt".to_string()]);
    }

    #[test]
    fn test_missing_sources_field_defaults_empty() {
        let raw = r#"{"answer": "ok"}"#;
        let result = postprocess(raw, "data/");

        let parsed: ModelAnswer = serde_json::from_str(&result).unwrap();
        assert!(parsed.sources.is_empty());
    }

    #[test]
    fn test_malformed_output_returned_unmodified() {
        let raw = "I could not find that in your notes.";
        assert_eq!(postprocess(raw, "data/"), raw);

        let half_json = r#"{"answer": "truncated"#;
        assert_eq!(postprocess(half_json, "data/"), half_json);
    }
}
