//! Relevance grading traits

use async_trait::async_trait;
use std::fmt::Debug;

use super::grade::{RelevanceGrade, RelevanceLevel};
use crate::domain::evidence::EvidenceDocument;
use crate::domain::DomainError;

/// First-stage filter: is a document relevant to the snippet at all
#[async_trait]
pub trait RelevanceGrader: Send + Sync + Debug {
    /// Grade a single document against a code snippet
    async fn grade_document(
        &self,
        snippet: &str,
        document: &EvidenceDocument,
    ) -> Result<RelevanceGrade, DomainError>;

    /// Grade documents independently, one grade per document in input order.
    /// Default implementation grades sequentially.
    async fn grade_documents(
        &self,
        snippet: &str,
        documents: &[EvidenceDocument],
    ) -> Result<Vec<RelevanceGrade>, DomainError> {
        let mut grades = Vec::with_capacity(documents.len());

        for document in documents {
            grades.push(self.grade_document(snippet, document).await?);
        }

        Ok(grades)
    }

    /// Get the grader name
    fn grader_name(&self) -> &'static str;
}

/// Second-stage filter: how strongly a relevant document supports the snippet
#[async_trait]
pub trait RelevanceLevelGrader: Send + Sync + Debug {
    /// Assign a level to a single document
    async fn level_document(
        &self,
        snippet: &str,
        document: &EvidenceDocument,
    ) -> Result<RelevanceLevel, DomainError>;

    /// Level documents independently, one level per document in input order
    async fn level_documents(
        &self,
        snippet: &str,
        documents: &[EvidenceDocument],
    ) -> Result<Vec<RelevanceLevel>, DomainError> {
        let mut levels = Vec::with_capacity(documents.len());

        for document in documents {
            levels.push(self.level_document(snippet, document).await?);
        }

        Ok(levels)
    }

    /// Get the grader name
    fn grader_name(&self) -> &'static str;
}
