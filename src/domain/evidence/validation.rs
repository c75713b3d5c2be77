//! Evidence store validation utilities

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum length for evidence store IDs
pub const MAX_STORE_ID_LENGTH: usize = 50;

/// Maximum number of documents a single similarity search may ask for
pub const MAX_TOP_K: u32 = 100;

static STORE_ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9_-]*[a-zA-Z0-9]$|^[a-zA-Z0-9]$").unwrap()
});

/// Evidence store validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum EvidenceValidationError {
    /// ID is empty
    EmptyId,
    /// ID exceeds maximum length
    IdTooLong { length: usize, max: usize },
    /// ID contains invalid characters
    InvalidIdFormat { id: String },
    /// Invalid top_k value
    InvalidTopK { value: u32, min: u32, max: u32 },
}

impl fmt::Display for EvidenceValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "Evidence store ID cannot be empty"),
            Self::IdTooLong { length, max } => {
                write!(
                    f,
                    "Evidence store ID too long: {} characters (max {})",
                    length, max
                )
            }
            Self::InvalidIdFormat { id } => {
                write!(
                    f,
                    "Invalid evidence store ID format '{}': must be alphanumeric with hyphens or underscores",
                    id
                )
            }
            Self::InvalidTopK { value, min, max } => {
                write!(
                    f,
                    "Invalid top_k {}: must be between {} and {}",
                    value, min, max
                )
            }
        }
    }
}

impl std::error::Error for EvidenceValidationError {}

/// Validate an evidence store ID
pub fn validate_evidence_store_id(id: &str) -> Result<(), EvidenceValidationError> {
    if id.is_empty() {
        return Err(EvidenceValidationError::EmptyId);
    }

    if id.len() > MAX_STORE_ID_LENGTH {
        return Err(EvidenceValidationError::IdTooLong {
            length: id.len(),
            max: MAX_STORE_ID_LENGTH,
        });
    }

    if !STORE_ID_PATTERN.is_match(id) {
        return Err(EvidenceValidationError::InvalidIdFormat { id: id.to_string() });
    }

    Ok(())
}

/// Validate the number of documents requested from a store
pub fn validate_top_k(top_k: u32) -> Result<(), EvidenceValidationError> {
    if top_k == 0 || top_k > MAX_TOP_K {
        return Err(EvidenceValidationError::InvalidTopK {
            value: top_k,
            min: 1,
            max: MAX_TOP_K,
        });
    }

    Ok(())
}
