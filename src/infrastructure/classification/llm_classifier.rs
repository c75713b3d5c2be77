//! LLM-backed package classifier

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::classification::prompt::{verdict_schema, VERDICT_SCHEMA_NAME};
use crate::domain::classification::{
    parse_verdict, PackageClassifier, PackageRecord, ParseMode, PromptVariant, Verdict,
};
use crate::domain::llm::{LlmProvider, LlmRequest, StructuredOutputStyle};
use crate::domain::DomainError;

/// Output token budget for one verdict
pub const CLASSIFICATION_MAX_TOKENS: u32 = 512;

#[derive(Debug, Clone)]
pub struct LlmPackageClassifier {
    provider: Arc<dyn LlmProvider>,
    model: String,
    style: StructuredOutputStyle,
    prompt: PromptVariant,
    parse_mode: ParseMode,
    max_tokens: u32,
    temperature: Option<f32>,
}

impl LlmPackageClassifier {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        model: impl Into<String>,
        style: StructuredOutputStyle,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            style,
            prompt: PromptVariant::Evidence,
            parse_mode: ParseMode::Tolerant,
            max_tokens: CLASSIFICATION_MAX_TOKENS,
            temperature: None,
        }
    }

    pub fn with_prompt(mut self, prompt: PromptVariant) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn with_parse_mode(mut self, mode: ParseMode) -> Self {
        self.parse_mode = mode;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }
}

#[async_trait]
impl PackageClassifier for LlmPackageClassifier {
    async fn classify(
        &self,
        package: &PackageRecord,
        snippet: &str,
        context: &str,
        evidence: &str,
    ) -> Result<Verdict, DomainError> {
        let mut builder = LlmRequest::builder()
            .messages(self.prompt.messages(package, snippet, context, evidence))
            .max_tokens(self.max_tokens)
            .response_format(
                self.style
                    .response_format(VERDICT_SCHEMA_NAME, verdict_schema()),
            );

        if let Some(temperature) = self.temperature {
            builder = builder.temperature(temperature);
        }

        let response = self.provider.chat(&self.model, builder.build()).await?;
        if response.is_truncated() {
            warn!(
                package = %package.package_name,
                max_tokens = self.max_tokens,
                "Classifier reply hit the token limit"
            );
        }

        let verdict = parse_verdict(response.content(), self.parse_mode);

        debug!(
            package = %package.package_name,
            prediction = ?verdict.prediction,
            recovered = verdict.recovered,
            finish_reason = ?response.finish_reason,
            prompt_tokens = response.usage.as_ref().map(|u| u.prompt_tokens),
            completion_tokens = response.usage.as_ref().map(|u| u.completion_tokens),
            "Parsed classifier reply"
        );

        Ok(verdict)
    }

    fn classifier_name(&self) -> &'static str {
        "llm"
    }
}
