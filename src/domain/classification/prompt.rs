//! Classification prompt and verdict schema

use serde_json::{json, Value};

use super::entity::PackageRecord;
use crate::domain::llm::Message;

/// Schema name sent with classification requests
pub const VERDICT_SCHEMA_NAME: &str = "python_package_classification_schema";

/// Which classification prompt to send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptVariant {
    /// Snippet plus retrieved evidence
    #[default]
    Evidence,
    /// Snippet only, no retrieval
    ZeroShot,
}

impl PromptVariant {
    pub fn messages(
        self,
        package: &PackageRecord,
        snippet: &str,
        context: &str,
        evidence: &str,
    ) -> Vec<Message> {
        match self {
            Self::Evidence => classification_messages(package, snippet, context, evidence),
            Self::ZeroShot => zero_shot_messages(package, snippet),
        }
    }
}

fn file_list_json(package: &PackageRecord) -> String {
    // serde_json cannot fail on a Vec<String>
    serde_json::to_string(&package.file_list).unwrap_or_else(|_| "[]".into())
}

/// Messages for one classification call.
///
/// `evidence` names what the context holds, e.g. "the YARA rule context".
pub fn classification_messages(
    package: &PackageRecord,
    snippet: &str,
    context: &str,
    evidence: &str,
) -> Vec<Message> {
    // serde_json cannot fail on a Vec<String>
    let files = serde_json::to_string_pretty(&package.file_list).unwrap_or_else(|_| "[]".into());

    let system = format!(
        "You are a cybersecurity expert analyzing potential malware in Python packages. \
Your task is to determine if a package is malicious or benign based on {evidence}.\n\n\
The Python package **{name}** contains the following files:\n{files}\n\n\
Use {evidence} to verify if the snippet from `setup.py` can cause the entire package \
to be detected as malicious. If no context is provided default to your internal knowledge.\n\n\
**If you don't know the answer, just say that you don't know.**",
        evidence = evidence,
        name = package.package_name,
        files = files,
    );

    vec![
        Message::system(system),
        Message::user(format!("code snippet:\n{}", snippet)),
        Message::user(format!("context:\n{}", context)),
    ]
}

/// Messages for a classification call without any evidence
pub fn zero_shot_messages(package: &PackageRecord, snippet: &str) -> Vec<Message> {
    let system = format!(
        "You are a cybersecurity expert analyzing potential malware in a Python package called {name}.\n\
You are provided with the names of the files in the package: {files}.\n\
Below is the beginning of the `setup.py` file.\n\n\
Your task:\n\
- Determine if the package is **Malicious (true) or Benign (false)**.\n\
- Provide a **brief explanation** (max 2 sentences) of why it is classified that way.",
        name = package.package_name,
        files = file_list_json(package),
    );

    vec![
        Message::system(system),
        Message::user(format!("file content: {}", snippet)),
    ]
}

/// Nested verdict schema; grammar backends receive it flattened
pub fn verdict_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "filename": {
                "type": "string",
                "description": "The name of the package being classified"
            },
            "result": {
                "type": "object",
                "properties": {
                    "prediction": {
                        "type": "boolean",
                        "description": "Prediction of whether the package is Malicious or Benign"
                    },
                    "explanation": {
                        "type": "string",
                        "description": "A brief explanation of why the package is classified this way in two sentences"
                    }
                },
                "required": ["prediction", "explanation"],
                "additionalProperties": false
            }
        },
        "required": ["filename", "result"],
        "additionalProperties": false
    })
}
