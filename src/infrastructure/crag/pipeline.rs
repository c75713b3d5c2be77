//! CRAG pipeline implementation
//!
//! Two evidence sources are consulted in turn. Each source's documents are
//! graded for relevance, the relevant ones are leveled, and the admitted
//! levels are merged into one labeled context.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::crag::{
    assemble_context, AssembledContext, ContextProvider, CragConfig, EvidenceSlot, GradedSource,
    LeveledDocument, RelevanceGrader, RelevanceLevelGrader, SourceContext, SourceSummary,
};
use crate::domain::evidence::{EvidenceDocument, EvidenceSource};
use crate::domain::DomainError;

const CRAG_EVIDENCE: &str = "the YARA rules and Git advisories in the context";

/// Two-source CRAG context builder
#[derive(Debug, Clone)]
pub struct CragPipeline {
    first: EvidenceSource,
    second: EvidenceSource,
    grader: Arc<dyn RelevanceGrader>,
    level_grader: Arc<dyn RelevanceLevelGrader>,
    config: CragConfig,
}

impl CragPipeline {
    pub fn new(
        first: EvidenceSource,
        second: EvidenceSource,
        grader: Arc<dyn RelevanceGrader>,
        level_grader: Arc<dyn RelevanceLevelGrader>,
        config: CragConfig,
    ) -> Self {
        Self {
            first,
            second,
            grader,
            level_grader,
            config,
        }
    }

    /// Retrieve, grade and level the source in `slot`
    pub async fn grade_source(
        &self,
        slot: EvidenceSlot,
        snippet: &str,
    ) -> Result<GradedSource, DomainError> {
        let source = match slot {
            EvidenceSlot::A => &self.first,
            EvidenceSlot::B => &self.second,
        };

        let documents = source.retrieve(snippet).await?;
        debug!(
            source = %source.label,
            state = %slot.retrieved(),
            retrieved = documents.len(),
            "Retrieved evidence"
        );

        let graded = self.grade_documents(source, snippet, documents).await?;
        debug!(
            source = %source.label,
            state = %slot.graded(),
            relevant = graded.summary.relevant,
            admitted = graded.summary.admitted,
            "Graded evidence"
        );

        Ok(graded)
    }

    async fn grade_documents(
        &self,
        source: &EvidenceSource,
        snippet: &str,
        documents: Vec<EvidenceDocument>,
    ) -> Result<GradedSource, DomainError> {
        if documents.is_empty() {
            return Ok(empty_source(&source.label, 0, 0));
        }

        let grades = self.grader.grade_documents(snippet, &documents).await?;
        if grades.len() != documents.len() {
            return Err(DomainError::internal(format!(
                "Grader returned {} grades for {} documents",
                grades.len(),
                documents.len()
            )));
        }

        let retrieved = documents.len();
        let relevant: Vec<EvidenceDocument> = documents
            .into_iter()
            .zip(grades)
            .filter(|(_, grade)| grade.is_relevant())
            .map(|(document, _)| document)
            .collect();

        if relevant.is_empty() {
            return Ok(empty_source(&source.label, retrieved, 0));
        }

        let levels = self.level_grader.level_documents(snippet, &relevant).await?;
        if levels.len() != relevant.len() {
            return Err(DomainError::internal(format!(
                "Level grader returned {} levels for {} documents",
                levels.len(),
                relevant.len()
            )));
        }

        let relevant_count = relevant.len();
        let leveled: Vec<LeveledDocument> = relevant
            .into_iter()
            .zip(levels)
            .map(|(document, level)| LeveledDocument::new(document, level))
            .collect();

        let admitted = leveled
            .iter()
            .filter(|d| self.config.admits(d.level))
            .count();
        let context = SourceContext::from_leveled(&source.label, &leveled, &self.config);

        Ok(GradedSource {
            context,
            summary: SourceSummary::new(&source.label, retrieved, relevant_count, admitted),
        })
    }
}

fn empty_source(label: &str, retrieved: usize, relevant: usize) -> GradedSource {
    GradedSource {
        context: SourceContext::empty(label),
        summary: SourceSummary::new(label, retrieved, relevant, 0),
    }
}

#[async_trait]
impl ContextProvider for CragPipeline {
    async fn build_context(&self, snippet: &str) -> Result<AssembledContext, DomainError> {
        let first = self.grade_source(EvidenceSlot::A, snippet).await?;
        let second = self.grade_source(EvidenceSlot::B, snippet).await?;

        let text = assemble_context(&first.context, &second.context);

        info!(
            first = %first.summary.label,
            first_admitted = first.summary.admitted,
            second = %second.summary.label,
            second_admitted = second.summary.admitted,
            "Context assembled"
        );

        Ok(AssembledContext::new(text, vec![first.summary, second.summary]))
    }

    fn evidence_description(&self) -> &str {
        CRAG_EVIDENCE
    }

    fn pipeline_name(&self) -> &'static str {
        "crag"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::crag::{
        MockRelevanceGrader, MockRelevanceLevelGrader, RelevanceLevel, NO_RELEVANT_CONTEXT,
    };
    use crate::domain::evidence::MockEvidenceStore;

    fn pipeline(
        yara: MockEvidenceStore,
        advisories: MockEvidenceStore,
        grader: Arc<MockRelevanceGrader>,
        level_grader: Arc<MockRelevanceLevelGrader>,
    ) -> CragPipeline {
        CragPipeline::new(
            EvidenceSource::new(Arc::new(yara), "YARA rules", 4),
            EvidenceSource::new(Arc::new(advisories), "Git advisories", 4),
            grader,
            level_grader,
            CragConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_single_high_rule_in_first_source() {
        let grader = Arc::new(MockRelevanceGrader::new().relevant("rule steal_env"));
        let level_grader = Arc::new(
            MockRelevanceLevelGrader::new().with_level("rule steal_env", RelevanceLevel::High),
        );
        let pipeline = pipeline(
            MockEvidenceStore::new("yara").with_documents(&["rule steal_env", "rule other"]),
            MockEvidenceStore::new("advisories").with_documents(&["GHSA unrelated"]),
            grader.clone(),
            level_grader.clone(),
        );

        let context = pipeline.build_context("os.environ").await.unwrap();

        assert_eq!(context.text, "YARA rules: \nrule steal_env");
        assert_eq!(context.sources[0], SourceSummary::new("YARA rules", 2, 1, 1));
        assert_eq!(context.sources[1], SourceSummary::new("Git advisories", 1, 0, 0));
        // only relevant documents are leveled
        assert_eq!(level_grader.leveled(), vec!["rule steal_env"]);
        assert_eq!(grader.graded().len(), 3);
    }

    #[tokio::test]
    async fn test_low_levels_are_dropped() {
        let grader = Arc::new(MockRelevanceGrader::new().relevant("r1").relevant("a1"));
        let level_grader = Arc::new(
            MockRelevanceLevelGrader::new()
                .with_level("r1", RelevanceLevel::Low)
                .with_level("a1", RelevanceLevel::Medium),
        );
        let pipeline = pipeline(
            MockEvidenceStore::new("yara").with_documents(&["r1"]),
            MockEvidenceStore::new("advisories").with_documents(&["a1"]),
            grader,
            level_grader,
        );

        let context = pipeline.build_context("snippet").await.unwrap();

        assert_eq!(context.text, "Git advisories: \na1");
    }

    #[tokio::test]
    async fn test_both_sources_admitted() {
        let grader = Arc::new(
            MockRelevanceGrader::new()
                .relevant("r1")
                .relevant("r2")
                .relevant("a1"),
        );
        let level_grader = Arc::new(
            MockRelevanceLevelGrader::new()
                .with_level("r1", RelevanceLevel::High)
                .with_level("r2", RelevanceLevel::Medium)
                .with_level("a1", RelevanceLevel::High),
        );
        let pipeline = pipeline(
            MockEvidenceStore::new("yara").with_documents(&["r1", "r2"]),
            MockEvidenceStore::new("advisories").with_documents(&["a1"]),
            grader,
            level_grader,
        );

        let context = pipeline.build_context("snippet").await.unwrap();

        assert_eq!(context.text, "YARA rules: \nr1 \nr2 \nGit advisories: \na1");
        assert_eq!(context.admitted(), 3);
    }

    #[tokio::test]
    async fn test_nothing_retrieved_is_sentinel() {
        let level_grader = Arc::new(MockRelevanceLevelGrader::new());
        let pipeline = pipeline(
            MockEvidenceStore::new("yara"),
            MockEvidenceStore::new("advisories"),
            Arc::new(MockRelevanceGrader::new()),
            level_grader.clone(),
        );

        let context = pipeline.build_context("snippet").await.unwrap();

        assert_eq!(context.text, NO_RELEVANT_CONTEXT);
        assert!(level_grader.leveled().is_empty());
    }

    #[tokio::test]
    async fn test_retrieval_failure_propagates() {
        let pipeline = pipeline(
            MockEvidenceStore::new("yara").with_documents(&["r1"]),
            MockEvidenceStore::new("advisories").with_error("connection reset"),
            Arc::new(MockRelevanceGrader::new()),
            Arc::new(MockRelevanceLevelGrader::new()),
        );

        let result = pipeline.build_context("snippet").await;

        assert!(matches!(result, Err(DomainError::Retrieval { .. })));
    }

    #[tokio::test]
    async fn test_grade_source_by_slot() {
        let pipeline = pipeline(
            MockEvidenceStore::new("yara").with_documents(&["r1", "r2"]),
            MockEvidenceStore::new("advisories").with_documents(&["a1"]),
            Arc::new(MockRelevanceGrader::new().relevant("a1")),
            Arc::new(MockRelevanceLevelGrader::new().with_level("a1", RelevanceLevel::High)),
        );

        let first = pipeline.grade_source(EvidenceSlot::A, "snippet").await.unwrap();
        let second = pipeline.grade_source(EvidenceSlot::B, "snippet").await.unwrap();

        assert_eq!(first.summary, SourceSummary::new("YARA rules", 2, 0, 0));
        assert!(first.context.is_empty());
        assert_eq!(second.summary, SourceSummary::new("Git advisories", 1, 1, 1));
        assert_eq!(second.context.text(), "a1");
    }

    #[tokio::test]
    async fn test_top_k_per_source() {
        let yara = Arc::new(MockEvidenceStore::new("yara").with_documents(&["1", "2", "3", "4", "5"]));
        let grader = Arc::new(MockRelevanceGrader::new());
        let pipeline = CragPipeline::new(
            EvidenceSource::new(yara.clone(), "YARA rules", 4),
            EvidenceSource::new(Arc::new(MockEvidenceStore::new("adv")), "Git advisories", 4),
            grader.clone(),
            Arc::new(MockRelevanceLevelGrader::new()),
            CragConfig::default(),
        );

        pipeline.build_context("snippet").await.unwrap();

        assert_eq!(grader.graded().len(), 4);
        assert_eq!(yara.search_count(), 1);
    }
}
