//! Evidence store trait

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use super::entity::{EvidenceDocument, EvidenceStoreId};
use crate::domain::error::DomainError;

/// Search parameters for a similarity query
#[derive(Debug, Clone)]
pub struct SearchParams {
    /// Query text, the package's code snippet
    pub query: String,
    /// Number of results to return
    pub top_k: u32,
}

impl SearchParams {
    /// Create new search parameters
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            top_k: 4,
        }
    }

    /// Set number of results
    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k;
        self
    }
}

/// Similarity-search capability over one named evidence collection.
///
/// Results are ordered most-similar first. Implementations do not retry;
/// a failed query is returned to the caller as-is.
#[async_trait]
pub trait EvidenceStore: Send + Sync + Debug {
    /// Get the store ID this adapter is configured for
    fn store_id(&self) -> &EvidenceStoreId;

    /// Get the backend type name
    fn store_type(&self) -> &'static str;

    /// Run a similarity search and return at most `top_k` documents
    async fn similarity_search(
        &self,
        params: SearchParams,
    ) -> Result<Vec<EvidenceDocument>, DomainError>;
}

/// A store together with how the pipeline consults it
#[derive(Debug, Clone)]
pub struct EvidenceSource {
    /// Backing store
    pub store: Arc<dyn EvidenceStore>,
    /// Label prefixed to this source's contribution in the final context
    pub label: String,
    /// Fixed number of documents retrieved per query
    pub top_k: u32,
}

impl EvidenceSource {
    pub fn new(store: Arc<dyn EvidenceStore>, label: impl Into<String>, top_k: u32) -> Self {
        Self {
            store,
            label: label.into(),
            top_k,
        }
    }

    /// Retrieve this source's top-k documents for a query
    pub async fn retrieve(&self, query: &str) -> Result<Vec<EvidenceDocument>, DomainError> {
        let params = SearchParams::new(query).with_top_k(self.top_k);
        self.store.similarity_search(params).await
    }
}
