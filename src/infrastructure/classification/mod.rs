//! Classifier implementations

mod llm_classifier;

pub use llm_classifier::{LlmPackageClassifier, CLASSIFICATION_MAX_TOKENS};
