//! Baseline context provider that retrieves nothing

use async_trait::async_trait;

use crate::domain::crag::{AssembledContext, ContextProvider};
use crate::domain::DomainError;

const ZERO_SHOT_EVIDENCE: &str = "your internal knowledge";

/// Empty context for every snippet; the classifier judges the code alone
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroShotPipeline;

impl ZeroShotPipeline {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ContextProvider for ZeroShotPipeline {
    async fn build_context(&self, _snippet: &str) -> Result<AssembledContext, DomainError> {
        Ok(AssembledContext::new(String::new(), Vec::new()))
    }

    fn evidence_description(&self) -> &str {
        ZERO_SHOT_EVIDENCE
    }

    fn pipeline_name(&self) -> &'static str {
        "zero_shot"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_context_is_empty() {
        let context = ZeroShotPipeline::new().build_context("import os").await.unwrap();

        assert!(context.text.is_empty());
        assert!(context.sources.is_empty());
        assert_eq!(context.admitted(), 0);
    }
}
