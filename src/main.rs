use clap::Parser;
use crag_package_classifier::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Crag(args) => cli::crag::run(args).await,
        Command::SimpleRag(args) => cli::simple_rag::run(args).await,
        Command::ZeroShot(args) => cli::zero_shot::run(args).await,
        Command::Report(args) => cli::report::run(args).await,
    }
}
