//! Context builders: the graded two-source CRAG pipeline, the ungraded
//! single-source variant and the no-evidence baseline

mod llm_grader;
mod pipeline;
mod simple_rag;
mod zero_shot;

pub use llm_grader::{LlmRelevanceGrader, LlmRelevanceLevelGrader};
pub use pipeline::CragPipeline;
pub use simple_rag::SimpleRagPipeline;
pub use zero_shot::ZeroShotPipeline;
