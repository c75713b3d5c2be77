//! Package classification domain

mod classifier;
mod entity;
mod parser;
pub mod prompt;

pub use classifier::PackageClassifier;
pub use entity::{ClassificationRecord, Label, PackageRecord, Verdict};
pub use parser::{
    extract_json, parse_verdict, truncate_sentences, ParseMode, MAX_EXPLANATION_SENTENCES,
};

pub use prompt::PromptVariant;

#[cfg(test)]
pub use classifier::mock::MockPackageClassifier;
