//! Simple-rag command - single-source evaluation run

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, ValueEnum};
use tracing::info;

use crate::config::{AppConfig, CollectionConfig};
use crate::domain::classification::PromptVariant;
use crate::domain::dataset::SnippetPolicy;

/// Collection used as the only evidence source
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EvidenceKind {
    /// Known-malicious `setup.py` samples
    MaliciousCode,
    /// Security advisories
    Advisories,
}

impl EvidenceKind {
    fn store_id(&self) -> &'static str {
        match self {
            Self::MaliciousCode => "malicious_code",
            Self::Advisories => "advisories",
        }
    }

    fn collection<'a>(&self, config: &'a AppConfig) -> &'a CollectionConfig {
        match self {
            Self::MaliciousCode => &config.evidence.malicious_code,
            Self::Advisories => &config.evidence.advisories,
        }
    }
}

/// Arguments for the simple-rag command
#[derive(Args, Clone, Debug)]
pub struct SimpleRagArgs {
    /// Evidence collection to retrieve from
    #[arg(long, value_enum)]
    pub source: EvidenceKind,

    /// CSV file results are appended to; existing rows are skipped
    #[arg(long)]
    pub result_file: PathBuf,

    /// Seed for the dataset shuffle (overrides config)
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Run a single-source evaluation
pub async fn run(args: SimpleRagArgs) -> anyhow::Result<()> {
    let mut config = super::bootstrap()?;
    if args.seed.is_some() {
        config.dataset.seed = args.seed;
    }

    let clients = crate::create_clients(&config).await?;
    let pipeline = crate::create_simple_rag_pipeline(
        &config,
        &clients,
        args.source.store_id(),
        args.source.collection(&config),
    )?;
    let classifier = crate::create_classifier(
        &config,
        &clients.llm,
        &clients.model,
        PromptVariant::Evidence,
    );

    let service = crate::create_evaluation_service(
        &config,
        Arc::new(pipeline),
        classifier,
        &args.result_file,
        SnippetPolicy::SINGLE_SOURCE,
    );

    info!(
        source = args.source.store_id(),
        result_file = %args.result_file.display(),
        "Starting single-source run"
    );
    let summary = service.run().await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_map_to_collections() {
        let config = AppConfig::default();

        assert_eq!(
            EvidenceKind::MaliciousCode.collection(&config).collection,
            "malicious_setup_py"
        );
        assert_eq!(EvidenceKind::Advisories.collection(&config).simple_rag_top_k, 2);
    }
}
