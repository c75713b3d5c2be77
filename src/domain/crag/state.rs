//! Per-package processing states

use std::fmt;

/// Where a package is in its processing.
///
/// A CRAG run walks every state in declaration order up to `Persisted`;
/// runs with a single source or no evidence skip the per-source states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    Pending,
    EvidenceARetrieved,
    EvidenceAGraded,
    EvidenceBRetrieved,
    EvidenceBGraded,
    ContextAssembled,
    Classified,
    Persisted,
    Skipped,
    Failed,
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::EvidenceARetrieved => "evidence_a_retrieved",
            Self::EvidenceAGraded => "evidence_a_graded",
            Self::EvidenceBRetrieved => "evidence_b_retrieved",
            Self::EvidenceBGraded => "evidence_b_graded",
            Self::ContextAssembled => "context_assembled",
            Self::Classified => "classified",
            Self::Persisted => "persisted",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Position of an evidence source in a two-source run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvidenceSlot {
    A,
    B,
}

impl EvidenceSlot {
    pub fn retrieved(self) -> ItemState {
        match self {
            Self::A => ItemState::EvidenceARetrieved,
            Self::B => ItemState::EvidenceBRetrieved,
        }
    }

    pub fn graded(self) -> ItemState {
        match self {
            Self::A => ItemState::EvidenceAGraded,
            Self::B => ItemState::EvidenceBGraded,
        }
    }
}
