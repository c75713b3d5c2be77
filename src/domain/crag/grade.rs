//! Relevance grades and levels, and how they are read out of free text

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::evidence::EvidenceDocument;

static YES_NO_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(yes|no)\b").unwrap());

static LEVEL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(high|medium|low)\b").unwrap());

/// Binary relevance of a document to a code snippet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelevanceGrade {
    Relevant,
    NotRelevant,
}

impl RelevanceGrade {
    /// Read a grade from a model reply.
    ///
    /// The first standalone `yes`/`no` token anywhere in the text wins.
    /// Anything else is `NotRelevant`.
    pub fn from_response(response: &str) -> Self {
        match YES_NO_PATTERN.find(response) {
            Some(m) if m.as_str().eq_ignore_ascii_case("yes") => Self::Relevant,
            _ => Self::NotRelevant,
        }
    }

    pub fn is_relevant(&self) -> bool {
        matches!(self, Self::Relevant)
    }
}

impl fmt::Display for RelevanceGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Relevant => write!(f, "yes"),
            Self::NotRelevant => write!(f, "no"),
        }
    }
}

/// Strength of a relevant document's support for a code snippet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelevanceLevel {
    High,
    Medium,
    Low,
}

impl RelevanceLevel {
    /// Read a level from a model reply; first `high`/`medium`/`low` token
    /// wins, `Low` when none is present.
    pub fn from_response(response: &str) -> Self {
        let Some(m) = LEVEL_PATTERN.find(response) else {
            return Self::Low;
        };

        match m.as_str().to_ascii_lowercase().as_str() {
            "high" => Self::High,
            "medium" => Self::Medium,
            _ => Self::Low,
        }
    }
}

impl fmt::Display for RelevanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

/// A relevant document together with its strength level
#[derive(Debug, Clone, PartialEq)]
pub struct LeveledDocument {
    pub document: EvidenceDocument,
    pub level: RelevanceLevel,
}

impl LeveledDocument {
    pub fn new(document: EvidenceDocument, level: RelevanceLevel) -> Self {
        Self { document, level }
    }
}
