//! Context-building pipeline types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use super::context::SourceContext;
use crate::domain::DomainError;

/// Per-source counts from one context build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSummary {
    /// Source label
    pub label: String,
    /// Documents returned by the store
    pub retrieved: usize,
    /// Documents graded relevant
    pub relevant: usize,
    /// Documents that made it into the context
    pub admitted: usize,
}

impl SourceSummary {
    pub fn new(label: impl Into<String>, retrieved: usize, relevant: usize, admitted: usize) -> Self {
        Self {
            label: label.into(),
            retrieved,
            relevant,
            admitted,
        }
    }
}

/// Context text handed to the classifier, with how it was obtained
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledContext {
    pub text: String,
    pub sources: Vec<SourceSummary>,
}

impl AssembledContext {
    pub fn new(text: impl Into<String>, sources: Vec<SourceSummary>) -> Self {
        Self {
            text: text.into(),
            sources,
        }
    }

    /// Documents admitted across all sources
    pub fn admitted(&self) -> usize {
        self.sources.iter().map(|s| s.admitted).sum()
    }
}

/// Graded evidence for one source, before assembly
#[derive(Debug, Clone, PartialEq)]
pub struct GradedSource {
    pub context: SourceContext,
    pub summary: SourceSummary,
}

/// Builds the evidence context for a code snippet
#[async_trait]
pub trait ContextProvider: Send + Sync + Debug {
    /// Retrieve, filter and assemble evidence for one snippet
    async fn build_context(&self, snippet: &str) -> Result<AssembledContext, DomainError>;

    /// Short description of the evidence used, for the classifier prompt
    fn evidence_description(&self) -> &str;

    /// Get the pipeline name
    fn pipeline_name(&self) -> &'static str;
}
