//! Structured-output request shapes per backend family

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::{LlmJsonSchema, LlmResponseFormat};

/// How a backend expects a structured-output schema to be attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StructuredOutputStyle {
    /// OpenAI `json_schema` response format, nested objects allowed
    #[default]
    JsonSchema,
    /// Text-generation-inference grammar; nested objects are flattened
    Grammar,
}

impl StructuredOutputStyle {
    /// Build the response format for an object schema
    pub fn response_format(&self, name: &str, schema: Value) -> LlmResponseFormat {
        match self {
            Self::JsonSchema => LlmResponseFormat::JsonSchema {
                json_schema: LlmJsonSchema::new(name, schema),
            },
            Self::Grammar => LlmResponseFormat::Grammar {
                value: flatten_schema(&schema),
            },
        }
    }
}

/// Hoist the properties of nested object properties to the top level.
///
/// Only `type`, `enum`, `minimum` and `maximum` survive on each leaf. A leaf
/// is required if its own parent object listed it as required.
pub fn flatten_schema(schema: &Value) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    let top_required = required_names(schema);

    if let Some(props) = schema.get("properties").and_then(Value::as_object) {
        for (key, prop) in props {
            if prop.get("type").and_then(Value::as_str) == Some("object") {
                let nested_required = required_names(prop);
                if let Some(nested) = prop.get("properties").and_then(Value::as_object) {
                    for (sub_key, sub_prop) in nested {
                        properties.insert(sub_key.clone(), leaf(sub_prop));
                        if nested_required.contains(&sub_key.as_str()) {
                            required.push(Value::String(sub_key.clone()));
                        }
                    }
                }
            } else {
                properties.insert(key.clone(), leaf(prop));
                if top_required.contains(&key.as_str()) {
                    required.push(Value::String(key.clone()));
                }
            }
        }
    }

    json!({
        "properties": properties,
        "required": required,
    })
}

fn required_names(schema: &Value) -> Vec<&str> {
    schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

fn leaf(prop: &Value) -> Value {
    let mut out = Map::new();
    for key in ["type", "enum", "minimum", "maximum"] {
        if let Some(value) = prop.get(key) {
            out.insert(key.to_string(), value.clone());
        }
    }
    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "filename": {"type": "string", "description": "package"},
                "result": {
                    "type": "object",
                    "properties": {
                        "prediction": {"type": "boolean"},
                        "explanation": {"type": "string"}
                    },
                    "required": ["prediction", "explanation"]
                }
            },
            "required": ["filename", "result"]
        })
    }

    #[test]
    fn test_flatten_hoists_nested_properties() {
        let flat = flatten_schema(&nested_schema());

        let props = flat["properties"].as_object().unwrap();
        assert_eq!(props.len(), 3);
        assert_eq!(props["filename"], json!({"type": "string"}));
        assert_eq!(props["prediction"], json!({"type": "boolean"}));

        let required: Vec<&str> = flat["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert!(required.contains(&"filename"));
        assert!(required.contains(&"prediction"));
        assert!(required.contains(&"explanation"));
        assert!(!required.contains(&"result"));
    }

    #[test]
    fn test_flatten_keeps_enum() {
        let schema = json!({
            "type": "object",
            "properties": {"grade": {"type": "string", "enum": ["yes", "no"]}},
            "required": ["grade"]
        });

        let flat = flatten_schema(&schema);
        assert_eq!(flat["properties"]["grade"]["enum"], json!(["yes", "no"]));
    }

    #[test]
    fn test_style_selects_format() {
        let json_schema = StructuredOutputStyle::JsonSchema.response_format("v", nested_schema());
        assert!(matches!(json_schema, LlmResponseFormat::JsonSchema { .. }));

        let grammar = StructuredOutputStyle::Grammar.response_format("v", nested_schema());
        match grammar {
            LlmResponseFormat::Grammar { value } => {
                assert!(value["properties"].get("result").is_none());
            }
            other => panic!("unexpected format {:?}", other),
        }
    }
}
