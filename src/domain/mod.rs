//! Domain layer - Core entities, traits and pure logic

pub mod classification;
pub mod crag;
pub mod dataset;
pub mod embedding;
pub mod error;
pub mod evidence;
pub mod llm;
pub mod report;
pub mod results;

pub use classification::{
    ClassificationRecord, Label, PackageClassifier, PackageRecord, ParseMode, Verdict,
};
pub use crag::{
    AssembledContext, ContextProvider, CragConfig, RelevanceGrade, RelevanceGrader,
    RelevanceLevel, RelevanceLevelGrader,
};
pub use dataset::{DatasetSource, SnippetPolicy};
pub use embedding::EmbeddingProvider;
pub use error::DomainError;
pub use evidence::{EvidenceDocument, EvidenceSource, EvidenceStore, EvidenceStoreId};
pub use llm::{LlmProvider, LlmRequest, LlmResponse, Message, MessageRole};
pub use report::AccuracyReport;
pub use results::ResultsRepository;
