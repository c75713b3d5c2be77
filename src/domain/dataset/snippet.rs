//! Shaping `setup.py` contents into prompt-sized snippets

use serde::{Deserialize, Serialize};

/// How much of a package's `setup.py` is sent to the models.
/// Lengths count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnippetPolicy {
    /// Whole file
    Full,
    /// First `n` characters
    Head(usize),
    /// Files longer than `2n` become the first and last `n` characters,
    /// each behind a marker; shorter files are unchanged
    HeadTail(usize),
}

impl Default for SnippetPolicy {
    fn default() -> Self {
        Self::CRAG
    }
}

impl SnippetPolicy {
    /// Policy of the two-source CRAG run
    pub const CRAG: Self = Self::HeadTail(300);

    /// Policy of the single-source runs
    pub const SINGLE_SOURCE: Self = Self::Head(300);

    pub fn apply(&self, source: &str) -> String {
        match *self {
            Self::Full => source.to_string(),
            Self::Head(n) => source.chars().take(n).collect(),
            Self::HeadTail(n) => {
                let total = source.chars().count();
                if total <= 2 * n {
                    return source.to_string();
                }
                let head: String = source.chars().take(n).collect();
                let tail: String = source.chars().skip(total - n).collect();
                format!("first {n} bytes:{head}  \nlast {n} bytes:{tail}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_keeps_everything() {
        assert_eq!(SnippetPolicy::Full.apply("abc"), "abc");
    }

    #[test]
    fn test_head() {
        assert_eq!(SnippetPolicy::Head(3).apply("abcdef"), "abc");
        assert_eq!(SnippetPolicy::Head(10).apply("abc"), "abc");
    }

    #[test]
    fn test_head_tail_short_source_unchanged() {
        assert_eq!(SnippetPolicy::HeadTail(3).apply("abcdef"), "abcdef");
    }

    #[test]
    fn test_head_tail_long_source() {
        let shaped = SnippetPolicy::HeadTail(2).apply("abcdefg");
        assert_eq!(shaped, "first 2 bytes:ab  \nlast 2 bytes:fg");
    }

    #[test]
    fn test_counts_characters() {
        assert_eq!(SnippetPolicy::Head(2).apply("éèà"), "éè");
    }

    #[test]
    fn test_deserialize() {
        let policy: SnippetPolicy = serde_json::from_str(r#"{"head_tail": 300}"#).unwrap();
        assert_eq!(policy, SnippetPolicy::CRAG);

        let policy: SnippetPolicy = serde_json::from_str(r#""full""#).unwrap();
        assert_eq!(policy, SnippetPolicy::Full);
    }
}
