//! Results persistence

use std::collections::HashSet;
use std::fmt;

use async_trait::async_trait;

use crate::domain::classification::ClassificationRecord;
use crate::domain::error::DomainError;

#[cfg(test)]
use mockall::automock;

/// Append-only store of classification records
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ResultsRepository: Send + Sync {
    /// Names of packages that already have a record
    async fn classified_packages(&self) -> Result<HashSet<String>, DomainError>;

    /// Appends one record
    async fn append(&self, record: &ClassificationRecord) -> Result<(), DomainError>;

    /// Reads every record back, in write order
    async fn load_all(&self) -> Result<Vec<ClassificationRecord>, DomainError>;
}

impl fmt::Debug for dyn ResultsRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ResultsRepository")
    }
}
