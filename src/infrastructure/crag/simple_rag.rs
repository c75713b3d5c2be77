//! Single-source retrieval without grading

use async_trait::async_trait;
use tracing::debug;

use crate::domain::crag::{
    AssembledContext, ContextProvider, SourceContext, SourceSummary, NO_RELEVANT_CONTEXT,
};
use crate::domain::evidence::EvidenceSource;
use crate::domain::DomainError;

/// Hands every retrieved document to the classifier, joined by a blank line
#[derive(Debug, Clone)]
pub struct SimpleRagPipeline {
    source: EvidenceSource,
    evidence: String,
}

impl SimpleRagPipeline {
    /// `evidence` describes the source to the classifier,
    /// e.g. "the advisories in the context"
    pub fn new(source: EvidenceSource, evidence: impl Into<String>) -> Self {
        Self {
            source,
            evidence: evidence.into(),
        }
    }
}

#[async_trait]
impl ContextProvider for SimpleRagPipeline {
    async fn build_context(&self, snippet: &str) -> Result<AssembledContext, DomainError> {
        let documents = self.source.retrieve(snippet).await?;
        debug!(source = %self.source.label, retrieved = documents.len(), "Retrieved evidence");

        let joined = documents
            .iter()
            .map(|d| d.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let context = SourceContext::from_text(&self.source.label, joined);
        let text = match context {
            SourceContext::Evidence { ref label, ref text } => format!("{}: \n{}", label, text),
            SourceContext::Empty { .. } => NO_RELEVANT_CONTEXT.to_string(),
        };

        let count = documents.len();
        Ok(AssembledContext::new(
            text,
            vec![SourceSummary::new(&self.source.label, count, count, count)],
        ))
    }

    fn evidence_description(&self) -> &str {
        &self.evidence
    }

    fn pipeline_name(&self) -> &'static str {
        "simple_rag"
    }
}
