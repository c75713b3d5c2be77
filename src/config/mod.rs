//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, ClassificationConfig, CollectionConfig, DatasetConfig, EmbeddingConfig,
    EvidenceConfig, LlmConfig, LogFormat, LoggingConfig, VectorStoreConfig,
};
