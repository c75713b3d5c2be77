//! CRAG (Corrective RAG) domain
//!
//! Retrieved evidence is filtered in two stages before it reaches the
//! classifier: a binary relevance grade, then a strength level for the
//! documents that passed. Only admitted levels make it into the context.

mod config;
mod context;
mod grade;
mod grader;
mod pipeline;
pub mod prompt;
mod state;

pub use config::CragConfig;
pub use context::{assemble_context, SourceContext, NO_RELEVANT_CONTEXT};
pub use grade::{LeveledDocument, RelevanceGrade, RelevanceLevel};
pub use grader::{RelevanceGrader, RelevanceLevelGrader};
pub use pipeline::{AssembledContext, ContextProvider, GradedSource, SourceSummary};
pub use state::{EvidenceSlot, ItemState};

#[cfg(test)]
pub use grader::mock::{MockRelevanceGrader, MockRelevanceLevelGrader};
#[cfg(test)]
pub use pipeline::mock::MockContextProvider;
