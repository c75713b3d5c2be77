use serde::Deserialize;

use crate::domain::classification::ParseMode;
use crate::domain::crag::CragConfig;
use crate::domain::dataset::SnippetPolicy;
use crate::infrastructure::embedding::DEFAULT_EMBEDDING_MODEL;
use crate::infrastructure::evidence::DistanceMetric;
use crate::infrastructure::llm::LlmProviderConfig;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub vector_store: VectorStoreConfig,
    #[serde(default)]
    pub evidence: EvidenceConfig,
    #[serde(default)]
    pub crag: CragConfig,
    #[serde(default)]
    pub classification: ClassificationConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Chat backend used for grading and classification
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: LlmProviderConfig,
    /// Falls back to the backend's default model
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub temperature: Option<f32>,
}

impl LlmConfig {
    pub fn model(&self) -> String {
        self.model
            .clone()
            .unwrap_or_else(|| self.provider.default_model().to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingConfig {
    pub model: String,
    /// OpenAI-compatible endpoint; api.openai.com if unset
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VectorStoreConfig {
    /// Schema holding the LangChain tables
    #[serde(default)]
    pub schema: Option<String>,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
    #[serde(default)]
    pub distance_metric: DistanceMetric,
}

/// One evidence collection and how it is presented to the model
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionConfig {
    pub collection: String,
    /// Prefix for this source's block in the context
    pub label: String,
    /// What the classifier is told the evidence is, in single-source runs
    pub description: String,
    /// Documents retrieved per query in CRAG runs
    pub top_k: u32,
    /// Documents retrieved per query in single-source runs
    pub simple_rag_top_k: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EvidenceConfig {
    pub yara_rules: CollectionConfig,
    pub advisories: CollectionConfig,
    pub malicious_code: CollectionConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassificationConfig {
    #[serde(default)]
    pub parse_mode: ParseMode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    pub malicious_path: String,
    pub benign_path: String,
    /// Overrides the run mode's own snippet shaping
    #[serde(default)]
    pub snippet_policy: Option<SnippetPolicy>,
    /// Seed for a reproducible shuffle
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            base_url: None,
        }
    }
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            schema: Some("malware".to_string()),
            max_connections: 5,
            connect_timeout_secs: 30,
            distance_metric: DistanceMetric::default(),
        }
    }
}

impl Default for EvidenceConfig {
    fn default() -> Self {
        Self {
            yara_rules: CollectionConfig {
                collection: "malware.yara_rules2".to_string(),
                label: "YARA rules".to_string(),
                description: "the YARA rules in the context".to_string(),
                top_k: 4,
                simple_rag_top_k: 4,
            },
            advisories: CollectionConfig {
                collection: "github_advisories".to_string(),
                label: "Git advisories".to_string(),
                description: "the advisories in the context".to_string(),
                top_k: 4,
                simple_rag_top_k: 2,
            },
            malicious_code: CollectionConfig {
                collection: "malicious_setup_py".to_string(),
                label: "Malicious code".to_string(),
                description: "the malicious code samples in the context".to_string(),
                top_k: 1,
                simple_rag_top_k: 1,
            },
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            malicious_path: "data/malicious_test.json".to_string(),
            benign_path: "data/benign_test.json".to_string(),
            snippet_policy: None,
            seed: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::crag::RelevanceLevel;
    use crate::domain::llm::StructuredOutputStyle;

    fn from_toml(toml: &str) -> AppConfig {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = from_toml("");

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.evidence.advisories.simple_rag_top_k, 2);
        assert_eq!(config.evidence.yara_rules.collection, "malware.yara_rules2");
        assert_eq!(config.embedding.model, "text-embedding-ada-002");
        assert_eq!(config.dataset.snippet_policy, None);
        assert_eq!(config.crag.grading_max_tokens, 64);
        assert_eq!(
            config.llm.provider.structured_output_style(),
            StructuredOutputStyle::Grammar
        );
    }

    #[test]
    fn test_sections_override_defaults() {
        let config = from_toml(
            r#"
            [logging]
            level = "debug"
            format = "json"

            [llm]
            model = "gpt-4o"
            timeout_secs = 60

            [llm.provider]
            type = "open_ai"

            [crag]
            admitted_levels = ["high"]
            grading_concurrency = 4

            [classification]
            parse_mode = "strict"

            [dataset]
            malicious_path = "m.json"
            benign_path = "b.json"
            seed = 42
            snippet_policy = { head = 300 }
            "#,
        );

        assert!(matches!(config.logging.format, LogFormat::Json));
        assert_eq!(config.llm.model(), "gpt-4o");
        assert_eq!(config.llm.provider, LlmProviderConfig::OpenAi { base_url: None });
        assert_eq!(config.crag.admitted_levels, vec![RelevanceLevel::High]);
        assert_eq!(config.crag.grading_concurrency, 4);
        assert_eq!(config.classification.parse_mode, ParseMode::Strict);
        assert_eq!(config.dataset.seed, Some(42));
        assert_eq!(config.dataset.snippet_policy, Some(SnippetPolicy::Head(300)));
    }

    #[test]
    fn test_model_falls_back_to_backend_default() {
        let config = LlmConfig::default();
        assert_eq!(config.model(), "meta-llama/Llama-3.1-8B-Instruct");
    }
}
