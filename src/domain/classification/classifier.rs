//! Package classifier trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{PackageRecord, Verdict};
use crate::domain::DomainError;

/// Final classification call: snippet plus evidence context in, verdict out
#[async_trait]
pub trait PackageClassifier: Send + Sync + Debug {
    /// Classify a package. Malformed model output is not an error; only a
    /// failed backend call is.
    async fn classify(
        &self,
        package: &PackageRecord,
        snippet: &str,
        context: &str,
        evidence: &str,
    ) -> Result<Verdict, DomainError>;

    /// Get the classifier name
    fn classifier_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    /// Records the contexts it was given; verdicts keyed by package name
    #[derive(Debug, Default)]
    pub struct MockPackageClassifier {
        verdicts: HashMap<String, bool>,
        failing: HashMap<String, String>,
        contexts: Mutex<Vec<(String, String)>>,
    }

    impl MockPackageClassifier {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_verdict(mut self, package: impl Into<String>, prediction: bool) -> Self {
            self.verdicts.insert(package.into(), prediction);
            self
        }

        pub fn failing_for(mut self, package: impl Into<String>, error: impl Into<String>) -> Self {
            self.failing.insert(package.into(), error.into());
            self
        }

        /// (package, context) pairs seen so far
        pub fn contexts(&self) -> Vec<(String, String)> {
            self.contexts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PackageClassifier for MockPackageClassifier {
        async fn classify(
            &self,
            package: &PackageRecord,
            _snippet: &str,
            context: &str,
            _evidence: &str,
        ) -> Result<Verdict, DomainError> {
            if let Some(error) = self.failing.get(&package.package_name) {
                return Err(DomainError::provider("mock_classifier", error));
            }

            self.contexts
                .lock()
                .unwrap()
                .push((package.package_name.clone(), context.to_string()));

            let prediction = self
                .verdicts
                .get(&package.package_name)
                .copied()
                .unwrap_or(false);

            Ok(Verdict::new(prediction, "Mock explanation."))
        }

        fn classifier_name(&self) -> &'static str {
            "mock"
        }
    }
}
