//! Classifier output parsing
//!
//! Models asked for JSON do not always return it. A strict decode is tried
//! first (on the whole reply, then on its outermost brace span); in tolerant
//! mode the fields are then pulled out one by one with regexes.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::entity::Verdict;

static PACKAGE_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""package_name"\s*:\s*"([^"]+)""#).unwrap());

static PREDICTION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)"prediction"\s*:\s*(true|false)"#).unwrap());

static EXPLANATION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s)"explanation"\s*:\s*"([^"]+)""#).unwrap());

/// Sentences kept from an explanation
pub const MAX_EXPLANATION_SENTENCES: usize = 2;

/// What to do with a reply that is not valid JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseMode {
    /// Fall back to regex extraction; always yields a prediction
    #[default]
    Tolerant,
    /// Record the reply as unparsed with a null prediction
    Strict,
}

#[derive(Debug, Deserialize)]
struct VerdictBody {
    prediction: bool,
    #[serde(default)]
    explanation: String,
}

/// The two answer shapes backends produce
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassifierResponse {
    Nested {
        #[serde(default)]
        filename: Option<String>,
        result: VerdictBody,
    },
    Flat {
        #[serde(default, alias = "filename")]
        package_name: Option<String>,
        prediction: bool,
        #[serde(default)]
        explanation: String,
    },
}

impl ClassifierResponse {
    fn into_verdict(self) -> Verdict {
        let (name, prediction, explanation) = match self {
            Self::Nested { filename, result } => (filename, result.prediction, result.explanation),
            Self::Flat {
                package_name,
                prediction,
                explanation,
            } => (package_name, prediction, explanation),
        };

        let verdict = Verdict::new(
            prediction,
            truncate_sentences(&explanation, MAX_EXPLANATION_SENTENCES),
        );
        match name {
            Some(name) => verdict.with_package_name(name),
            None => verdict,
        }
    }
}

/// Turn raw model text into a verdict. Never fails.
pub fn parse_verdict(raw: &str, mode: ParseMode) -> Verdict {
    if let Some(verdict) = decode_strict(raw) {
        return verdict;
    }

    match mode {
        ParseMode::Strict => {
            warn!("Classifier reply is not valid JSON, recording it unparsed");
            Verdict::unparsed(truncate_sentences(raw, MAX_EXPLANATION_SENTENCES))
        }
        ParseMode::Tolerant => {
            warn!("Classifier reply is not valid JSON, extracting fields by pattern");
            extract_fields(raw)
        }
    }
}

fn decode_strict(raw: &str) -> Option<Verdict> {
    if let Ok(response) = serde_json::from_str::<ClassifierResponse>(raw.trim()) {
        return Some(response.into_verdict());
    }

    let span = extract_json(raw)?;
    serde_json::from_str::<ClassifierResponse>(span)
        .ok()
        .map(ClassifierResponse::into_verdict)
}

/// Outermost `{ ... }` span of a string (handles prose and code fences)
pub fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if start < end {
        Some(&text[start..=end])
    } else {
        None
    }
}

fn extract_fields(raw: &str) -> Verdict {
    let prediction = PREDICTION_PATTERN
        .captures(raw)
        .map(|c| c[1].eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let explanation = EXPLANATION_PATTERN
        .captures(raw)
        .map(|c| c[1].to_string())
        .unwrap_or_default();

    let verdict = Verdict::new(
        prediction,
        truncate_sentences(&explanation, MAX_EXPLANATION_SENTENCES),
    )
    .recovered();

    match PACKAGE_NAME_PATTERN.captures(raw) {
        Some(c) => verdict.with_package_name(&c[1]),
        None => verdict,
    }
}

/// Keep the first `max` sentences. A sentence ends at `.`, `!` or `?`
/// followed by whitespace; kept sentences are rejoined with one space.
pub fn truncate_sentences(text: &str, max: usize) -> String {
    let mut sentences: Vec<&str> = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }

        let Some(&(boundary, next)) = chars.peek() else {
            break;
        };
        if !next.is_whitespace() {
            continue;
        }

        sentences.push(&text[start..boundary]);
        if sentences.len() == max {
            return sentences.join(" ");
        }

        let mut resume = boundary;
        while let Some(&(i, w)) = chars.peek() {
            if !w.is_whitespace() {
                break;
            }
            resume = i + w.len_utf8();
            chars.next();
        }
        start = resume;
    }

    if start < text.len() {
        sentences.push(&text[start..]);
    }

    sentences.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_json_is_truncated() {
        let raw = r#"{"package_name":"foo","prediction":true,"explanation":"Bad. Very bad. Extra sentence."}"#;

        let verdict = parse_verdict(raw, ParseMode::Tolerant);

        assert_eq!(verdict.prediction, Some(true));
        assert_eq!(verdict.explanation, "Bad. Very bad.");
        assert_eq!(verdict.package_name.as_deref(), Some("foo"));
        assert!(!verdict.recovered);
    }

    #[test]
    fn test_nested_json() {
        let raw = r#"{"filename":"bar","result":{"prediction":false,"explanation":"Looks fine."}}"#;

        let verdict = parse_verdict(raw, ParseMode::Strict);

        assert_eq!(verdict.prediction, Some(false));
        assert_eq!(verdict.explanation, "Looks fine.");
        assert_eq!(verdict.package_name.as_deref(), Some("bar"));
    }

    #[test]
    fn test_flat_with_filename_key() {
        let raw = r#"{"filename":"baz","prediction":true,"explanation":"Exfiltrates env."}"#;
        let verdict = parse_verdict(raw, ParseMode::Tolerant);
        assert_eq!(verdict.package_name.as_deref(), Some("baz"));
        assert_eq!(verdict.prediction, Some(true));
    }

    #[test]
    fn test_json_inside_code_fence() {
        let raw = "Here you go:\n```json\n{\"prediction\": true, \"explanation\": \"Runs curl.\"}\n```";

        let verdict = parse_verdict(raw, ParseMode::Strict);

        assert_eq!(verdict.prediction, Some(true));
        assert_eq!(verdict.explanation, "Runs curl.");
        assert!(!verdict.recovered);
    }

    #[test]
    fn test_regex_fallback() {
        let raw = r#"noise {"prediction": true, "explanation": "Looks suspicious." trailing"#;

        let verdict = parse_verdict(raw, ParseMode::Tolerant);

        assert_eq!(verdict.prediction, Some(true));
        assert_eq!(verdict.explanation, "Looks suspicious.");
        assert!(verdict.recovered);
    }

    #[test]
    fn test_regex_fallback_case_insensitive_prediction() {
        let raw = r#""package_name": "p", "prediction": TRUE,"#;
        let verdict = parse_verdict(raw, ParseMode::Tolerant);
        assert_eq!(verdict.prediction, Some(true));
        assert_eq!(verdict.package_name.as_deref(), Some("p"));
    }

    #[test]
    fn test_fallback_defaults() {
        let verdict = parse_verdict("I don't know.", ParseMode::Tolerant);

        assert_eq!(verdict.prediction, Some(false));
        assert_eq!(verdict.explanation, "");
        assert_eq!(verdict.package_name, None);
    }

    #[test]
    fn test_strict_mode_keeps_raw_reply() {
        let raw = r#"{"prediction": maybe}"#;

        let verdict = parse_verdict(raw, ParseMode::Strict);

        assert_eq!(verdict.prediction, None);
        assert_eq!(verdict.explanation, raw);
    }

    #[test]
    fn test_strict_mode_truncates_raw_reply() {
        let raw = "I cannot tell. The snippet is cut off. It may call curl.";

        let verdict = parse_verdict(raw, ParseMode::Strict);

        assert_eq!(verdict.prediction, None);
        assert_eq!(verdict.explanation, "I cannot tell. The snippet is cut off.");
    }

    #[test]
    fn test_extract_json_span() {
        assert_eq!(extract_json("x {\"a\": 1} y"), Some("{\"a\": 1}"));
        assert_eq!(extract_json("} nothing {"), None);
        assert_eq!(extract_json("plain"), None);
    }

    #[test]
    fn test_truncate_sentences() {
        assert_eq!(truncate_sentences("One. Two! Three?", 2), "One. Two!");
        assert_eq!(truncate_sentences("One.  \n Two. Three.", 2), "One. Two.");
        assert_eq!(truncate_sentences("No terminator here", 2), "No terminator here");
        assert_eq!(truncate_sentences("v1.2 is bad. Yes.", 2), "v1.2 is bad. Yes.");
        assert_eq!(truncate_sentences("", 2), "");
    }
}
