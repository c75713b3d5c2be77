//! Labeled test-set loading

mod snippet;

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::classification::PackageRecord;
use crate::domain::DomainError;

pub use snippet::SnippetPolicy;

#[cfg(test)]
pub use mock::MockDatasetSource;

/// Source of the labeled packages to classify, in processing order
#[async_trait]
pub trait DatasetSource: Send + Sync + Debug {
    async fn load(&self) -> Result<Vec<PackageRecord>, DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;

    /// Returns a fixed list of packages in the given order
    #[derive(Debug, Default)]
    pub struct MockDatasetSource {
        records: Vec<PackageRecord>,
        error: Option<String>,
    }

    impl MockDatasetSource {
        pub fn new(records: Vec<PackageRecord>) -> Self {
            Self {
                records,
                error: None,
            }
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }
    }

    #[async_trait]
    impl DatasetSource for MockDatasetSource {
        async fn load(&self) -> Result<Vec<PackageRecord>, DomainError> {
            if let Some(ref error) = self.error {
                return Err(DomainError::dataset(error));
            }
            Ok(self.records.clone())
        }
    }
}
