//! Infrastructure services

mod evaluation_service;

pub use evaluation_service::{EvaluationService, ItemOutcome, RunSummary, SkipReason};
