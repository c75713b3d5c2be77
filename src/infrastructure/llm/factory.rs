use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::http_client::HttpClient;
use super::OpenAiProvider;
use crate::domain::llm::StructuredOutputStyle;
use crate::domain::{DomainError, LlmProvider};

const DEFAULT_HUGGING_FACE_BASE_URL: &str = "https://router.huggingface.co";

/// Chat-completion backend selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LlmProviderConfig {
    OpenAi {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base_url: Option<String>,
    },
    HuggingFace {
        #[serde(default = "default_hugging_face_base_url")]
        base_url: String,
    },
}

fn default_hugging_face_base_url() -> String {
    DEFAULT_HUGGING_FACE_BASE_URL.to_string()
}

impl Default for LlmProviderConfig {
    fn default() -> Self {
        Self::HuggingFace {
            base_url: default_hugging_face_base_url(),
        }
    }
}

impl LlmProviderConfig {
    /// Environment variable holding this backend's API key
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Self::OpenAi { .. } => "OPENAI_API_KEY",
            Self::HuggingFace { .. } => "HUGGING_FACE_KEY",
        }
    }

    /// Model used when none is configured
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::OpenAi { .. } => "gpt-4o-mini",
            Self::HuggingFace { .. } => "meta-llama/Llama-3.1-8B-Instruct",
        }
    }

    /// How this backend wants structured output requested
    pub fn structured_output_style(&self) -> StructuredOutputStyle {
        match self {
            Self::OpenAi { .. } => StructuredOutputStyle::JsonSchema,
            Self::HuggingFace { .. } => StructuredOutputStyle::Grammar,
        }
    }
}

/// A ready chat backend and the structured-output style it expects
#[derive(Debug, Clone)]
pub struct LlmBackend {
    pub provider: Arc<dyn LlmProvider>,
    pub style: StructuredOutputStyle,
}

/// Factory for creating LLM providers
#[derive(Debug)]
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Create a backend from configuration and its API key
    pub fn create(
        config: &LlmProviderConfig,
        api_key: &str,
        timeout_secs: Option<u64>,
    ) -> Result<LlmBackend, DomainError> {
        if api_key.trim().is_empty() {
            return Err(DomainError::configuration(format!(
                "{} is not set",
                config.api_key_env()
            )));
        }

        let http_client = HttpClient::from_timeout_secs(timeout_secs)?;

        let provider: Arc<dyn LlmProvider> = match config {
            LlmProviderConfig::OpenAi { base_url: None } => {
                Arc::new(OpenAiProvider::new(http_client, api_key))
            }
            LlmProviderConfig::OpenAi {
                base_url: Some(base_url),
            } => Arc::new(OpenAiProvider::with_base_url(http_client, api_key, base_url)),
            LlmProviderConfig::HuggingFace { base_url } => Arc::new(
                OpenAiProvider::with_base_url(http_client, api_key, base_url)
                    .with_name("huggingface"),
            ),
        };

        Ok(LlmBackend {
            provider,
            style: config.structured_output_style(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_openai_backend() {
        let config = LlmProviderConfig::OpenAi { base_url: None };

        let backend = LlmProviderFactory::create(&config, "sk-test", None).unwrap();

        assert_eq!(backend.provider.provider_name(), "openai");
        assert_eq!(backend.style, StructuredOutputStyle::JsonSchema);
    }

    #[test]
    fn test_create_hugging_face_backend() {
        let backend =
            LlmProviderFactory::create(&LlmProviderConfig::default(), "hf_test", Some(30)).unwrap();

        assert_eq!(backend.provider.provider_name(), "huggingface");
        assert_eq!(backend.style, StructuredOutputStyle::Grammar);
    }

    #[test]
    fn test_missing_api_key() {
        let err = LlmProviderFactory::create(&LlmProviderConfig::default(), "  ", None).unwrap_err();
        assert!(err.to_string().contains("HUGGING_FACE_KEY"));
    }

    #[test]
    fn test_deserialize_config() {
        let config: LlmProviderConfig = serde_json::from_str(r#"{"type": "hugging_face"}"#).unwrap();
        assert_eq!(
            config,
            LlmProviderConfig::HuggingFace {
                base_url: "https://router.huggingface.co".to_string()
            }
        );

        let config: LlmProviderConfig = serde_json::from_str(r#"{"type": "open_ai"}"#).unwrap();
        assert_eq!(config.api_key_env(), "OPENAI_API_KEY");
        assert_eq!(config.default_model(), "gpt-4o-mini");
    }
}
