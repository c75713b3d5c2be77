//! Append-only CSV results file
//!
//! One header line written when the file is created, then one row per
//! classified package. Fields holding a comma, quote or line break are
//! quoted with doubled inner quotes.

use std::collections::HashSet;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::warn;

use crate::domain::classification::{ClassificationRecord, Label};
use crate::domain::results::ResultsRepository;
use crate::domain::DomainError;

pub const RESULTS_HEADER: [&str; 4] = ["package_name", "label", "llm_prediction", "explanation"];

#[derive(Debug)]
pub struct CsvResultsRepository {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CsvResultsRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    async fn read_rows(&self) -> Result<Vec<Vec<String>>, DomainError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(DomainError::storage(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let mut rows = parse_csv(&content);
        if rows
            .first()
            .and_then(|row| row.first())
            .is_some_and(|first| first == RESULTS_HEADER[0])
        {
            rows.remove(0);
        }
        Ok(rows)
    }
}

#[async_trait]
impl ResultsRepository for CsvResultsRepository {
    async fn classified_packages(&self) -> Result<HashSet<String>, DomainError> {
        Ok(self
            .read_rows()
            .await?
            .into_iter()
            .filter_map(|row| row.into_iter().next())
            .filter(|name| !name.is_empty())
            .collect())
    }

    async fn append(&self, record: &ClassificationRecord) -> Result<(), DomainError> {
        let _guard = self.write_lock.lock().await;

        let needs_header = match tokio::fs::metadata(&self.path).await {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| {
                DomainError::storage(format!("Failed to open {}: {}", self.path.display(), e))
            })?;

        let mut out = String::new();
        if needs_header {
            out.push_str(&RESULTS_HEADER.join(","));
            out.push('\n');
        }
        out.push_str(&format_row(record));
        out.push('\n');

        file.write_all(out.as_bytes()).await.map_err(|e| {
            DomainError::storage(format!("Failed to write {}: {}", self.path.display(), e))
        })?;
        file.flush()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to flush results: {}", e)))
    }

    async fn load_all(&self) -> Result<Vec<ClassificationRecord>, DomainError> {
        let rows = self.read_rows().await?;
        let mut records = Vec::with_capacity(rows.len());

        for (i, row) in rows.into_iter().enumerate() {
            match parse_record(row) {
                Some(record) => records.push(record),
                None => warn!(row = i + 1, "Skipping malformed results row"),
            }
        }

        Ok(records)
    }
}

fn format_row(record: &ClassificationRecord) -> String {
    let prediction = match record.prediction {
        Some(true) => "True",
        Some(false) => "False",
        None => "",
    };

    [
        quote_field(&record.package_name),
        record.label.to_string(),
        prediction.to_string(),
        quote_field(&record.explanation),
    ]
    .join(",")
}

fn quote_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn parse_record(row: Vec<String>) -> Option<ClassificationRecord> {
    let mut fields = row.into_iter();
    let package_name = fields.next()?;
    let label = parse_label(&fields.next()?)?;
    let prediction = parse_prediction(&fields.next().unwrap_or_default());
    let explanation = fields.next().unwrap_or_default();

    Some(ClassificationRecord {
        package_name,
        label,
        prediction,
        explanation,
    })
}

fn parse_label(value: &str) -> Option<Label> {
    let value = value.trim();
    let numeric = value.strip_suffix(".0").unwrap_or(value);
    numeric.parse::<u8>().ok().and_then(Label::from_u8)
}

fn parse_prediction(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Split CSV text into rows of unquoted fields
fn parse_csv(content: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            _ => field.push(c),
        }
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}
