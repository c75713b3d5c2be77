//! Merging per-source evidence into one labeled context block

use super::config::CragConfig;
use super::grade::LeveledDocument;

/// Stand-in for a source (or a whole context) with nothing admitted
pub const NO_RELEVANT_CONTEXT: &str = "No relevant context found";

/// Separator between documents of one source, and between the two sources
const JOIN: &str = " \n";

/// One source's contribution after grading
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceContext {
    /// Admitted documents joined into one text
    Evidence { label: String, text: String },
    /// Nothing retrieved, nothing relevant, or nothing at an admitted level
    Empty { label: String },
}

impl SourceContext {
    /// Keep documents at admitted levels and join them in retrieval order
    pub fn from_leveled(
        label: impl Into<String>,
        documents: &[LeveledDocument],
        config: &CragConfig,
    ) -> Self {
        let admitted: Vec<&str> = documents
            .iter()
            .filter(|d| config.admits(d.level))
            .map(|d| d.document.content.as_str())
            .collect();

        if admitted.is_empty() {
            Self::Empty {
                label: label.into(),
            }
        } else {
            Self::Evidence {
                label: label.into(),
                text: admitted.join(JOIN),
            }
        }
    }

    /// Wrap already-joined text; the sentinel string counts as empty
    pub fn from_text(label: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() || text == NO_RELEVANT_CONTEXT {
            Self::Empty {
                label: label.into(),
            }
        } else {
            Self::Evidence {
                label: label.into(),
                text,
            }
        }
    }

    pub fn empty(label: impl Into<String>) -> Self {
        Self::Empty {
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Evidence { label, .. } | Self::Empty { label } => label,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }

    /// Text contributed to the context, the sentinel when empty
    pub fn text(&self) -> &str {
        match self {
            Self::Evidence { text, .. } => text,
            Self::Empty { .. } => NO_RELEVANT_CONTEXT,
        }
    }

    fn labeled(&self) -> Option<String> {
        match self {
            Self::Evidence { label, text } => Some(format!("{}:{}{}", label, JOIN, text)),
            Self::Empty { .. } => None,
        }
    }
}

/// Combine two sources under the four-way rule: an empty source is dropped,
/// both empty yields the sentinel alone.
pub fn assemble_context(first: &SourceContext, second: &SourceContext) -> String {
    match (first.labeled(), second.labeled()) {
        (None, None) => NO_RELEVANT_CONTEXT.to_string(),
        (Some(a), None) => a,
        (None, Some(b)) => b,
        (Some(a), Some(b)) => format!("{}{}{}", a, JOIN, b),
    }
}
