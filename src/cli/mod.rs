//! CLI module for the package classifier
//!
//! Provides subcommands for the evaluation runs and for scoring them:
//! - `crag`: two-source CRAG run
//! - `simple-rag`: single-source run without grading
//! - `zero-shot`: baseline run without retrieval
//! - `report`: accuracy of a results file

pub mod crag;
pub mod report;
pub mod simple_rag;
pub mod zero_shot;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Classify packages as malicious or benign with retrieval-augmented LLM calls
#[derive(Parser)]
#[command(name = "crag-package-classifier")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Classify the test set with graded evidence from two collections
    Crag(crag::CragArgs),

    /// Classify the test set with ungraded evidence from one collection
    SimpleRag(simple_rag::SimpleRagArgs),

    /// Classify the test set from the code snippet alone, as a baseline
    ZeroShot(zero_shot::ZeroShotArgs),

    /// Compute accuracy metrics from a results file
    Report(report::ReportArgs),
}

/// Load `.env` and configuration, then install logging
fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    logging::init_logging(&config.logging);

    Ok(config)
}
