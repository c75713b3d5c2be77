//! Accuracy report over a results file

use serde::Serialize;

use crate::domain::classification::{ClassificationRecord, Label};

/// Confusion matrix with malicious as the positive class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    pub true_positives: usize,
    pub false_positives: usize,
    pub true_negatives: usize,
    pub false_negatives: usize,
}

impl ConfusionMatrix {
    pub fn total(&self) -> usize {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }
}

/// Summary metrics for one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccuracyReport {
    pub records: usize,
    /// Rows with an empty prediction; excluded from the matrix
    pub unparsed: usize,
    pub matrix: ConfusionMatrix,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl AccuracyReport {
    pub fn from_records(records: &[ClassificationRecord]) -> Self {
        let mut matrix = ConfusionMatrix::default();
        let mut unparsed = 0;

        for record in records {
            match (record.label, record.prediction) {
                (_, None) => unparsed += 1,
                (Label::Malicious, Some(true)) => matrix.true_positives += 1,
                (Label::Malicious, Some(false)) => matrix.false_negatives += 1,
                (Label::Benign, Some(true)) => matrix.false_positives += 1,
                (Label::Benign, Some(false)) => matrix.true_negatives += 1,
            }
        }

        let accuracy = ratio(matrix.true_positives + matrix.true_negatives, matrix.total());
        let precision = ratio(
            matrix.true_positives,
            matrix.true_positives + matrix.false_positives,
        );
        let recall = ratio(
            matrix.true_positives,
            matrix.true_positives + matrix.false_negatives,
        );
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Self {
            records: records.len(),
            unparsed,
            matrix,
            accuracy,
            precision,
            recall,
            f1,
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(label: Label, prediction: Option<bool>) -> ClassificationRecord {
        ClassificationRecord {
            package_name: "p".to_string(),
            label,
            prediction,
            explanation: String::new(),
        }
    }

    #[test]
    fn test_counts_and_ratios() {
        let records = vec![
            record(Label::Malicious, Some(true)),
            record(Label::Malicious, Some(true)),
            record(Label::Malicious, Some(false)),
            record(Label::Benign, Some(false)),
            record(Label::Benign, Some(true)),
            record(Label::Benign, None),
        ];

        let report = AccuracyReport::from_records(&records);

        assert_eq!(report.records, 6);
        assert_eq!(report.unparsed, 1);
        assert_eq!(report.matrix.true_positives, 2);
        assert_eq!(report.matrix.false_negatives, 1);
        assert_eq!(report.matrix.true_negatives, 1);
        assert_eq!(report.matrix.false_positives, 1);
        assert!((report.accuracy - 0.6).abs() < 1e-9);
        assert!((report.precision - 2.0 / 3.0).abs() < 1e-9);
        assert!((report.recall - 2.0 / 3.0).abs() < 1e-9);
        assert!((report.f1 - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_report() {
        let report = AccuracyReport::from_records(&[]);
        assert_eq!(report.matrix.total(), 0);
        assert_eq!(report.accuracy, 0.0);
        assert_eq!(report.f1, 0.0);
    }
}
