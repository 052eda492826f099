//! Model output normalizer
//!
//! Generative model responses nominally contain one JSON object but arrive
//! as free text, sometimes wrapped in prose or triple-backtick fences. The
//! normalizer is a two-stage parser returning a tagged outcome so each call
//! site chooses degrade-vs-fail deliberately instead of relying on an
//! implicit fallthrough.

use serde_json::Value;

/// Tagged outcome of the two-stage parse pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    /// The fence-stripped text parsed directly as a JSON object
    Parsed(Value),
    /// Direct parse failed; a greedy `{...}` span inside the text parsed
    Degraded(Value),
    /// No JSON object could be recovered; raw text preserved for the caller
    Failed { raw: String },
}

impl Normalized {
    /// The recovered object, regardless of which stage produced it
    pub fn into_value(self) -> Option<Value> {
        match self {
            Normalized::Parsed(v) | Normalized::Degraded(v) => Some(v),
            Normalized::Failed { .. } => None,
        }
    }
}

/// Extract a structured object from raw model output
///
/// Stage 1: strip fence markers and attempt a direct parse of the trimmed
/// text. Stage 2: take the greedy span from the first `{` to the last `}`
/// and parse that. Key order, whitespace, and missing optional fields are
/// the caller's concern; nothing is defaulted here.
pub fn normalize(raw: &str) -> Normalized {
    let stripped = strip_fences(raw);

    if let Ok(value) = serde_json::from_str::<Value>(stripped.trim()) {
        if value.is_object() {
            return Normalized::Parsed(value);
        }
    }

    if let Some(span) = brace_span(stripped) {
        if let Ok(value) = serde_json::from_str::<Value>(span) {
            if value.is_object() {
                return Normalized::Degraded(value);
            }
        }
    }

    Normalized::Failed {
        raw: raw.to_string(),
    }
}

/// Remove triple-backtick fence markers, with or without a language tag
fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop an optional language tag on the opening fence line
    let rest = match rest.split_once('\n') {
        Some((_tag, body)) => body,
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Greedy span from the first `{` to the last `}`, if both exist
fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end > start {
        Some(&text[start..=end])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_bare_json_object() {
        let raw = r#"{"level":"B1","confidence":0.8}"#;
        match normalize(raw) {
            Normalized::Parsed(v) => {
                assert_eq!(v, json!({"level": "B1", "confidence": 0.8}));
            }
            other => panic!("expected Parsed, got {:?}", other),
        }
    }

    #[test]
    fn parses_fenced_json_with_language_tag() {
        let raw = "```json\n{\"level\": \"A2\", \"scores\": {\"grammar\": 40}}\n```";
        match normalize(raw) {
            Normalized::Parsed(v) => {
                assert_eq!(v["level"], "A2");
                assert_eq!(v["scores"]["grammar"], 40);
            }
            other => panic!("expected Parsed, got {:?}", other),
        }
    }

    #[test]
    fn parses_fenced_json_without_language_tag() {
        let raw = "```\n{\"level\": \"C1\"}\n```";
        assert!(normalize(raw).into_value().is_some());
    }

    #[test]
    fn recovers_object_embedded_in_prose() {
        let raw = "Sure! Here is the evaluation you asked for:\n\
                   {\"level\": \"B2\", \"confidence\": 0.7}\n\
                   Let me know if you need anything else.";
        match normalize(raw) {
            Normalized::Degraded(v) => {
                assert_eq!(v["level"], "B2");
                assert_eq!(v["confidence"], 0.7);
            }
            other => panic!("expected Degraded, got {:?}", other),
        }
    }

    #[test]
    fn round_trips_object_with_unusual_whitespace_and_key_order() {
        let original = json!({
            "confidence": 0.91,
            "scores": {"cohesion": 70, "vocabulary": 85, "grammar": 80},
            "level": "C1",
            "explanation": "Strong control of structure."
        });
        let raw = format!(
            "noise before   \n```json\n  {}  \n```   trailing words",
            serde_json::to_string_pretty(&original).unwrap()
        );
        let recovered = normalize(&raw).into_value().unwrap();
        assert_eq!(recovered, original);
    }

    #[test]
    fn pure_prose_fails_with_raw_preserved() {
        let raw = "I could not produce a score for this sample.";
        match normalize(raw) {
            Normalized::Failed { raw: kept } => assert_eq!(kept, raw),
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn non_object_json_fails() {
        assert!(matches!(normalize("[1, 2, 3]"), Normalized::Failed { .. }));
        assert!(matches!(normalize("42"), Normalized::Failed { .. }));
    }

    #[test]
    fn unbalanced_braces_fail() {
        assert!(matches!(
            normalize("start { \"level\": incomplete"),
            Normalized::Failed { .. }
        ));
    }

    #[test]
    fn missing_optional_fields_stay_absent() {
        let raw = r#"{"level":"B1","scores":{"vocabulary":50,"grammar":50,"cohesion":50},"explanation":"ok"}"#;
        let v = normalize(raw).into_value().unwrap();
        assert!(v.get("confidence").is_none());
        assert!(v.get("improvements").is_none());
    }
}
