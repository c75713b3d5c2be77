//! Crag command - two-source CRAG evaluation run

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use tracing::info;

use crate::domain::classification::PromptVariant;
use crate::domain::dataset::SnippetPolicy;

/// Arguments for the crag command
#[derive(Args, Clone, Debug)]
pub struct CragArgs {
    /// CSV file results are appended to; existing rows are skipped
    #[arg(long)]
    pub result_file: PathBuf,

    /// Seed for the dataset shuffle (overrides config)
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Run the CRAG evaluation
pub async fn run(args: CragArgs) -> anyhow::Result<()> {
    let mut config = super::bootstrap()?;
    if args.seed.is_some() {
        config.dataset.seed = args.seed;
    }

    let clients = crate::create_clients(&config).await?;
    let pipeline = crate::create_crag_pipeline(&config, &clients)?;
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
        SnippetPolicy::CRAG,
    );

    info!(result_file = %args.result_file.display(), "Starting CRAG run");
    let summary = service.run().await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
