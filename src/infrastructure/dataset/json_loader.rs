//! JSON test-set loader
//!
//! Two files, one per label, each a JSON array of
//! `{"package_name", "setup.py", "file_list"}` objects.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Deserialize;
use tracing::info;

use crate::domain::classification::{Label, PackageRecord};
use crate::domain::dataset::{DatasetSource, SnippetPolicy};
use crate::domain::DomainError;

#[derive(Debug, Deserialize)]
struct RawPackage {
    package_name: String,
    #[serde(rename = "setup.py", default)]
    setup_py: Option<String>,
    #[serde(default)]
    file_list: Vec<String>,
}

/// Loads, labels, concatenates and shuffles the malicious and benign sets
#[derive(Debug, Clone)]
pub struct JsonDatasetLoader {
    malicious_path: PathBuf,
    benign_path: PathBuf,
    policy: SnippetPolicy,
    shuffle: bool,
    seed: Option<u64>,
}

impl JsonDatasetLoader {
    pub fn new(malicious_path: impl Into<PathBuf>, benign_path: impl Into<PathBuf>) -> Self {
        Self {
            malicious_path: malicious_path.into(),
            benign_path: benign_path.into(),
            policy: SnippetPolicy::default(),
            shuffle: true,
            seed: None,
        }
    }

    pub fn with_policy(mut self, policy: SnippetPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Fixed shuffle order across runs
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    async fn read_file(&self, path: &Path, label: Label) -> Result<Vec<PackageRecord>, DomainError> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            DomainError::dataset(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let raw: Vec<RawPackage> = serde_json::from_str(&content).map_err(|e| {
            DomainError::dataset(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        Ok(raw
            .into_iter()
            .map(|p| PackageRecord {
                package_name: p.package_name,
                code_snippet: p.setup_py.map(|s| self.policy.apply(&s)),
                file_list: p.file_list,
                label,
            })
            .collect())
    }
}

#[async_trait]
impl DatasetSource for JsonDatasetLoader {
    async fn load(&self) -> Result<Vec<PackageRecord>, DomainError> {
        let mut records = self.read_file(&self.malicious_path, Label::Malicious).await?;
        records.extend(self.read_file(&self.benign_path, Label::Benign).await?);

        if self.shuffle {
            match self.seed {
                Some(seed) => records.shuffle(&mut StdRng::seed_from_u64(seed)),
                None => records.shuffle(&mut rand::thread_rng()),
            }
        }

        info!(packages = records.len(), "Test dataset loaded");
        Ok(records)
    }
}
