//! CRAG configuration types

use serde::{Deserialize, Serialize};

use super::grade::RelevanceLevel;

/// Configuration for the two-stage relevance filter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CragConfig {
    /// Levels whose documents are admitted into the context
    #[serde(default = "default_admitted_levels")]
    pub admitted_levels: Vec<RelevanceLevel>,
    /// Model used for grading (falls back to the classifier model)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grading_model: Option<String>,
    /// Output token budget for each grading request
    #[serde(default = "default_grading_max_tokens")]
    pub grading_max_tokens: u32,
    /// Grading requests allowed in flight for one item's documents
    #[serde(default = "default_grading_concurrency")]
    pub grading_concurrency: usize,
    /// Sampling temperature for grading requests (backend default if unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

fn default_admitted_levels() -> Vec<RelevanceLevel> {
    vec![RelevanceLevel::High, RelevanceLevel::Medium]
}

fn default_grading_max_tokens() -> u32 {
    64
}

fn default_grading_concurrency() -> usize {
    1
}

impl Default for CragConfig {
    fn default() -> Self {
        Self {
            admitted_levels: default_admitted_levels(),
            grading_model: None,
            grading_max_tokens: default_grading_max_tokens(),
            grading_concurrency: default_grading_concurrency(),
            temperature: None,
        }
    }
}

impl CragConfig {
    /// Create a new CRAG configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the admitted levels
    pub fn with_admitted_levels(mut self, levels: Vec<RelevanceLevel>) -> Self {
        self.admitted_levels = levels;
        self
    }

    /// Set the grading model
    pub fn with_grading_model(mut self, model: impl Into<String>) -> Self {
        self.grading_model = Some(model.into());
        self
    }

    /// Set how many grading requests may run at once (minimum 1)
    pub fn with_grading_concurrency(mut self, concurrency: usize) -> Self {
        self.grading_concurrency = concurrency.max(1);
        self
    }

    /// Set the grading temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature.clamp(0.0, 2.0));
        self
    }

    /// Whether documents at this level survive into the context
    pub fn admits(&self, level: RelevanceLevel) -> bool {
        self.admitted_levels.contains(&level)
    }

    /// Effective concurrency, never below one
    pub fn concurrency(&self) -> usize {
        self.grading_concurrency.max(1)
    }
}
