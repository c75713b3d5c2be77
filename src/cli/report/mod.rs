//! Report command - accuracy metrics of a results file

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use crate::domain::report::AccuracyReport;
use crate::domain::results::ResultsRepository;
use crate::infrastructure::results::CsvResultsRepository;

/// Arguments for the report command
#[derive(Args, Clone, Debug)]
pub struct ReportArgs {
    /// Results file written by a classification run
    #[arg(long)]
    pub result_file: PathBuf,
}

/// Print the accuracy report as JSON
pub async fn run(args: ReportArgs) -> anyhow::Result<()> {
    super::bootstrap()?;

    let report = build_report(&args.result_file).await?;

    info!(
        records = report.records,
        unparsed = report.unparsed,
        accuracy = report.accuracy,
        precision = report.precision,
        recall = report.recall,
        f1 = report.f1,
        "Accuracy report"
    );
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

async fn build_report(result_file: &std::path::Path) -> anyhow::Result<AccuracyReport> {
    if !tokio::fs::try_exists(result_file).await? {
        anyhow::bail!("Results file not found: {}", result_file.display());
    }

    let records = CsvResultsRepository::new(result_file).load_all().await?;
    Ok(AccuracyReport::from_records(&records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_report_from_results_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results.csv");
        std::fs::write(
            &path,
            "package_name,label,llm_prediction,explanation\na,1,True,x\nb,0,False,y\nc,0,True,z\nd,1,,raw\n",
        )
        .unwrap();

        let report = build_report(&path).await.unwrap();

        assert_eq!(report.records, 4);
        assert_eq!(report.unparsed, 1);
        assert_eq!(report.matrix.true_positives, 1);
        assert_eq!(report.matrix.false_positives, 1);
        assert_eq!(report.matrix.true_negatives, 1);
    }

    #[tokio::test]
    async fn test_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        assert!(build_report(&dir.path().join("none.csv")).await.is_err());
    }
}
