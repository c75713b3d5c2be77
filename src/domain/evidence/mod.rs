//! Evidence domain - similarity-searchable collections of reference documents

mod entity;
mod store;
mod validation;

pub use entity::{EvidenceDocument, EvidenceStoreId};
pub use store::{EvidenceSource, EvidenceStore, SearchParams};
pub use validation::{
    validate_evidence_store_id, validate_top_k, EvidenceValidationError, MAX_TOP_K,
};

#[cfg(test)]
pub use store::mock::MockEvidenceStore;
