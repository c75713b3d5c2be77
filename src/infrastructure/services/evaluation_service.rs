//! Evaluation service
//!
//! Drives one run over a labeled test set: for each package in load order,
//! build the evidence context, classify, and append the record. Items are
//! processed one at a time and a failing item never stops the run.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::domain::classification::{ClassificationRecord, PackageClassifier, PackageRecord};
use crate::domain::crag::{ContextProvider, ItemState};
use crate::domain::dataset::DatasetSource;
use crate::domain::results::ResultsRepository;
use crate::domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// A record for this package is already in the results file
    AlreadyClassified,
    /// The package has no code snippet
    MissingSnippet,
}

/// Result of processing one package
#[derive(Debug)]
pub enum ItemOutcome {
    Persisted(ClassificationRecord),
    Skipped(SkipReason),
    Failed(DomainError),
}

impl ItemOutcome {
    pub fn state(&self) -> ItemState {
        match self {
            Self::Persisted(_) => ItemState::Persisted,
            Self::Skipped(_) => ItemState::Skipped,
            Self::Failed(_) => ItemState::Failed,
        }
    }
}

/// Counts for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub persisted: usize,
    pub already_classified: usize,
    pub missing_snippet: usize,
    pub failed: usize,
    /// Persisted records whose prediction could not be read
    pub unparsed: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &ItemOutcome) {
        self.total += 1;
        match outcome {
            ItemOutcome::Persisted(record) => {
                self.persisted += 1;
                if record.prediction.is_none() {
                    self.unparsed += 1;
                }
            }
            ItemOutcome::Skipped(SkipReason::AlreadyClassified) => self.already_classified += 1,
            ItemOutcome::Skipped(SkipReason::MissingSnippet) => self.missing_snippet += 1,
            ItemOutcome::Failed(_) => self.failed += 1,
        }
    }
}

#[derive(Debug)]
pub struct EvaluationService {
    dataset: Arc<dyn DatasetSource>,
    context: Arc<dyn ContextProvider>,
    classifier: Arc<dyn PackageClassifier>,
    results: Arc<dyn ResultsRepository>,
}

impl EvaluationService {
    pub fn new(
        dataset: Arc<dyn DatasetSource>,
        context: Arc<dyn ContextProvider>,
        classifier: Arc<dyn PackageClassifier>,
        results: Arc<dyn ResultsRepository>,
    ) -> Self {
        Self {
            dataset,
            context,
            classifier,
            results,
        }
    }

    /// Process every package of the test set.
    ///
    /// Only loading the dataset or reading back existing results can fail
    /// the run; per-package errors end up in the summary.
    pub async fn run(&self) -> Result<RunSummary, DomainError> {
        let packages = self.dataset.load().await?;
        let mut classified = self.results.classified_packages().await?;

        info!(
            pipeline = self.context.pipeline_name(),
            classifier = self.classifier.classifier_name(),
            packages = packages.len(),
            already_classified = classified.len(),
            "Starting evaluation run"
        );

        let mut summary = RunSummary::default();

        for package in &packages {
            debug!(package = %package.package_name, state = %ItemState::Pending, "Item queued");
            let outcome = self.process(package, &mut classified).await;
            debug!(package = %package.package_name, state = %outcome.state(), "Item done");
            summary.record(&outcome);
        }

        info!(
            total = summary.total,
            persisted = summary.persisted,
            already_classified = summary.already_classified,
            missing_snippet = summary.missing_snippet,
            failed = summary.failed,
            "Evaluation run finished"
        );

        Ok(summary)
    }

    /// Process a single package, recording it in `classified` once persisted
    pub async fn process(
        &self,
        package: &PackageRecord,
        classified: &mut HashSet<String>,
    ) -> ItemOutcome {
        let name = package.package_name.as_str();

        if classified.contains(name) {
            debug!(package = %name, "Already classified, skipping");
            return ItemOutcome::Skipped(SkipReason::AlreadyClassified);
        }

        let Some(snippet) = package.code_snippet.as_deref() else {
            info!(package = %name, "No code snippet, skipping");
            return ItemOutcome::Skipped(SkipReason::MissingSnippet);
        };

        info!(package = %name, label = %package.label, "Classifying package");

        match self.classify(package, snippet).await {
            Ok(record) => {
                classified.insert(record.package_name.clone());
                ItemOutcome::Persisted(record)
            }
            Err(e) => {
                error!(package = %name, error = %e, "Failed to classify package");
                ItemOutcome::Failed(e)
            }
        }
    }

    async fn classify(
        &self,
        package: &PackageRecord,
        snippet: &str,
    ) -> Result<ClassificationRecord, DomainError> {
        let name = package.package_name.as_str();

        let context = self.context.build_context(snippet).await?;
        debug!(
            package = %name,
            state = %ItemState::ContextAssembled,
            admitted = context.admitted(),
            "Context ready"
        );

        let verdict = self
            .classifier
            .classify(package, snippet, &context.text, self.context.evidence_description())
            .await?;
        debug!(package = %name, state = %ItemState::Classified, "Verdict received");

        if verdict.prediction.is_none() {
            warn!(package = %name, "Classifier answer could not be parsed");
        }

        let record = ClassificationRecord::new(package, verdict);
        self.results.append(&record).await?;

        info!(
            package = %name,
            label = %record.label,
            prediction = ?record.prediction,
            "Package classified"
        );

        Ok(record)
    }
}
