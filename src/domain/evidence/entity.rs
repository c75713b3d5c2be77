//! Evidence store identity and retrieved documents

use serde::{Deserialize, Serialize};

use super::validation::{validate_evidence_store_id, EvidenceValidationError};

/// Evidence store identifier - alphanumeric with hyphens or underscores
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EvidenceStoreId(String);

impl EvidenceStoreId {
    /// Create a new EvidenceStoreId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, EvidenceValidationError> {
        let id = id.into();
        validate_evidence_store_id(&id)?;
        Ok(Self(id))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EvidenceStoreId {
    type Error = EvidenceValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EvidenceStoreId> for String {
    fn from(id: EvidenceStoreId) -> Self {
        id.0
    }
}

impl std::fmt::Display for EvidenceStoreId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One piece of evidence returned by a similarity search: a YARA rule body,
/// an advisory description or a sample of malicious code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceDocument {
    /// Identifier of the row/chunk inside the store
    pub id: String,
    /// Text payload handed to the graders and the classifier
    pub content: String,
    /// Similarity score (higher is more similar)
    pub score: f32,
    /// Store the document was retrieved from
    pub store: EvidenceStoreId,
}

impl EvidenceDocument {
    /// Create a new evidence document
    pub fn new(
        store: EvidenceStoreId,
        id: impl Into<String>,
        content: impl Into<String>,
        score: f32,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            score,
            store,
        }
    }
}
