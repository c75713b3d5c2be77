//! Grading prompts and their structured-output schemas

use serde_json::{json, Value};

use crate::domain::llm::Message;

const GRADE_INSTRUCTIONS: &str = "You are an expert grader assessing the relevance of a retrieved document to a code snippet.
Follow these instructions for grading:
- If the YARA rules or git advisory explained by the context are relevant to the code snippet, grade it as relevant.
- Your grade should be either 'yes' or 'no' to indicate whether the document is relevant to the code snippet or not.
- Provide only 'yes' or 'no' as your final response without additional explanations.";

const LEVEL_INSTRUCTIONS: &str = "You are an expert grader assessing the level of relevance of a retrieved document to a code snippet.
Follow these instructions for grading:
- If the YARA rules or git advisory explained by the context are really significant or explain the code snippet, set level as high, else judge it as low or medium.
- Your grade should be either 'high' or 'low' or 'medium' to indicate the level of the relevance to the code snippet.
- Provide only 'high' or 'low' or 'medium' as your final response without additional explanations.";

/// Schema name sent with relevance grading requests
pub const GRADE_SCHEMA_NAME: &str = "relevance_grade";

/// Schema name sent with level grading requests
pub const LEVEL_SCHEMA_NAME: &str = "relevance_level";

fn grading_messages(instructions: &str, snippet: &str, document: &str) -> Vec<Message> {
    vec![
        Message::system(instructions),
        Message::user(format!("code snippet:\n{}", snippet)),
        Message::user(format!("context:\n{}", document)),
    ]
}

/// Messages asking whether one document is relevant to a snippet
pub fn grade_messages(snippet: &str, document: &str) -> Vec<Message> {
    grading_messages(GRADE_INSTRUCTIONS, snippet, document)
}

/// Messages asking how strongly one document relates to a snippet
pub fn level_messages(snippet: &str, document: &str) -> Vec<Message> {
    grading_messages(LEVEL_INSTRUCTIONS, snippet, document)
}

pub fn grade_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "grade": {"type": "string", "enum": ["yes", "no"]}
        },
        "required": ["grade"],
        "additionalProperties": false
    })
}

pub fn level_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "level": {"type": "string", "enum": ["high", "medium", "low"]}
        },
        "required": ["level"],
        "additionalProperties": false
    })
}
