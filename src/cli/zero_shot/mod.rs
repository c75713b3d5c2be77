//! Zero-shot command - baseline evaluation run without retrieval

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use tracing::info;

use crate::domain::classification::PromptVariant;
use crate::domain::dataset::SnippetPolicy;
use crate::infrastructure::crag::ZeroShotPipeline;

/// Arguments for the zero-shot command
#[derive(Args, Clone, Debug)]
pub struct ZeroShotArgs {
    /// CSV file results are appended to; existing rows are skipped
    #[arg(long)]
    pub result_file: PathBuf,

    /// Seed for the dataset shuffle (overrides config)
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Run the baseline. Only the chat backend is needed.
pub async fn run(args: ZeroShotArgs) -> anyhow::Result<()> {
    let mut config = super::bootstrap()?;
    if args.seed.is_some() {
        config.dataset.seed = args.seed;
    }

    let (llm, model) = crate::create_llm(&config)?;
    let classifier = crate::create_classifier(&config, &llm, &model, PromptVariant::ZeroShot);

    let service = crate::create_evaluation_service(
        &config,
        Arc::new(ZeroShotPipeline::new()),
        classifier,
        &args.result_file,
        SnippetPolicy::SINGLE_SOURCE,
    );

    info!(result_file = %args.result_file.display(), "Starting zero-shot run");
    let summary = service.run().await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
