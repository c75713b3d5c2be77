//! Classification entities

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ground-truth label of a dataset package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Benign,
    Malicious,
}

impl Label {
    /// Numeric form used in results files (1 malicious, 0 benign)
    pub fn as_u8(&self) -> u8 {
        match self {
            Self::Benign => 0,
            Self::Malicious => 1,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Benign),
            1 => Some(Self::Malicious),
            _ => None,
        }
    }

    pub fn is_malicious(&self) -> bool {
        matches!(self, Self::Malicious)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// One item of the labeled test set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageRecord {
    pub package_name: String,
    /// The package's `setup.py`, possibly shaped for prompting; absent for some packages
    pub code_snippet: Option<String>,
    pub file_list: Vec<String>,
    pub label: Label,
}

impl PackageRecord {
    pub fn new(package_name: impl Into<String>, label: Label) -> Self {
        Self {
            package_name: package_name.into(),
            code_snippet: None,
            file_list: Vec::new(),
            label,
        }
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.code_snippet = Some(snippet.into());
        self
    }

    pub fn with_files(mut self, files: Vec<String>) -> Self {
        self.file_list = files;
        self
    }
}

/// Parsed classifier answer
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    /// Package name echoed by the model, if any
    pub package_name: Option<String>,
    /// `None` only when strict parsing rejected the answer
    pub prediction: Option<bool>,
    pub explanation: String,
    /// Whether the answer was only readable through the regex fallback
    pub recovered: bool,
}

impl Verdict {
    pub fn new(prediction: bool, explanation: impl Into<String>) -> Self {
        Self {
            package_name: None,
            prediction: Some(prediction),
            explanation: explanation.into(),
            recovered: false,
        }
    }

    /// Answer that could not be decoded; the raw text is kept as explanation
    pub fn unparsed(raw: impl Into<String>) -> Self {
        Self {
            package_name: None,
            prediction: None,
            explanation: raw.into(),
            recovered: false,
        }
    }

    pub fn with_package_name(mut self, name: impl Into<String>) -> Self {
        self.package_name = Some(name.into());
        self
    }

    pub fn recovered(mut self) -> Self {
        self.recovered = true;
        self
    }
}

/// One persisted row of a results file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    pub package_name: String,
    pub label: Label,
    pub prediction: Option<bool>,
    pub explanation: String,
}

impl ClassificationRecord {
    pub fn new(package: &PackageRecord, verdict: Verdict) -> Self {
        Self {
            package_name: package.package_name.clone(),
            label: package.label,
            prediction: verdict.prediction,
            explanation: verdict.explanation,
        }
    }
}
