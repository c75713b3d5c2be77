//! LLM-based relevance graders
//!
//! One chat request per document. Replies are read with a token scan, so a
//! model that ignores the requested schema still produces a usable grade.

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde_json::Value;
use tracing::debug;

use crate::domain::crag::prompt::{
    grade_messages, grade_schema, level_messages, level_schema, GRADE_SCHEMA_NAME,
    LEVEL_SCHEMA_NAME,
};
use crate::domain::crag::{
    CragConfig, RelevanceGrade, RelevanceGrader, RelevanceLevel, RelevanceLevelGrader,
};
use crate::domain::evidence::EvidenceDocument;
use crate::domain::llm::{LlmProvider, LlmRequest, Message, StructuredOutputStyle};
use crate::domain::DomainError;

/// Shared request plumbing for both grading stages
#[derive(Debug, Clone)]
struct GradingClient {
    provider: Arc<dyn LlmProvider>,
    model: String,
    style: StructuredOutputStyle,
    config: CragConfig,
}

impl GradingClient {
    async fn ask(
        &self,
        messages: Vec<Message>,
        schema_name: &str,
        schema: Value,
    ) -> Result<String, DomainError> {
        let mut builder = LlmRequest::builder()
            .messages(messages)
            .max_tokens(self.config.grading_max_tokens)
            .response_format(self.style.response_format(schema_name, schema));

        if let Some(temperature) = self.config.temperature {
            builder = builder.temperature(temperature);
        }

        let response = self.provider.chat(&self.model, builder.build()).await?;
        Ok(response.content().to_string())
    }
}

/// Yes/no relevance grader backed by a chat model
#[derive(Debug, Clone)]
pub struct LlmRelevanceGrader {
    client: GradingClient,
}

impl LlmRelevanceGrader {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        model: impl Into<String>,
        style: StructuredOutputStyle,
        config: CragConfig,
    ) -> Self {
        Self {
            client: GradingClient {
                provider,
                model: model.into(),
                style,
                config,
            },
        }
    }
}

#[async_trait]
impl RelevanceGrader for LlmRelevanceGrader {
    async fn grade_document(
        &self,
        snippet: &str,
        document: &EvidenceDocument,
    ) -> Result<RelevanceGrade, DomainError> {
        let reply = self
            .client
            .ask(
                grade_messages(snippet, &document.content),
                GRADE_SCHEMA_NAME,
                grade_schema(),
            )
            .await?;

        let grade = RelevanceGrade::from_response(&reply);
        debug!(document = %document.id, store = %document.store, %grade, "Graded document");
        Ok(grade)
    }

    async fn grade_documents(
        &self,
        snippet: &str,
        documents: &[EvidenceDocument],
    ) -> Result<Vec<RelevanceGrade>, DomainError> {
        let pending: Vec<_> = documents
            .iter()
            .map(|document| self.grade_document(snippet, document))
            .collect();
        stream::iter(pending)
            .buffered(self.client.config.concurrency())
            .try_collect()
            .await
    }

    fn grader_name(&self) -> &'static str {
        "llm"
    }
}

/// High/medium/low strength grader backed by a chat model
#[derive(Debug, Clone)]
pub struct LlmRelevanceLevelGrader {
    client: GradingClient,
}

impl LlmRelevanceLevelGrader {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        model: impl Into<String>,
        style: StructuredOutputStyle,
        config: CragConfig,
    ) -> Self {
        Self {
            client: GradingClient {
                provider,
                model: model.into(),
                style,
                config,
            },
        }
    }
}

#[async_trait]
impl RelevanceLevelGrader for LlmRelevanceLevelGrader {
    async fn level_document(
        &self,
        snippet: &str,
        document: &EvidenceDocument,
    ) -> Result<RelevanceLevel, DomainError> {
        let reply = self
            .client
            .ask(
                level_messages(snippet, &document.content),
                LEVEL_SCHEMA_NAME,
                level_schema(),
            )
            .await?;

        let level = RelevanceLevel::from_response(&reply);
        debug!(document = %document.id, store = %document.store, %level, "Leveled document");
        Ok(level)
    }

    async fn level_documents(
        &self,
        snippet: &str,
        documents: &[EvidenceDocument],
    ) -> Result<Vec<RelevanceLevel>, DomainError> {
        let pending: Vec<_> = documents
            .iter()
            .map(|document| self.level_document(snippet, document))
            .collect();
        stream::iter(pending)
            .buffered(self.client.config.concurrency())
            .try_collect()
            .await
    }

    fn grader_name(&self) -> &'static str {
        "llm"
    }
}
