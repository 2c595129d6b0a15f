//! Wire-facing tool types shared by every transport.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::schema::JsonSchema;
use super::validator::ValidationIssue;

/// A tool as advertised to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub input_schema: JsonSchema,
}

/// One content item of a tool result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

impl ContentItem {
    /// A text item.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content_type: "text".to_string(),
            text: text.into(),
        }
    }
}

/// The normalized result of a tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub content: Vec<ContentItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl ToolResult {
    /// A successful result with a single text item.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentItem::text(text)],
            is_error: None,
        }
    }

    /// A failed result with a single text item.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentItem::text(text)],
            is_error: Some(true),
        }
    }

    /// Whether the result reports an error.
    pub fn is_error(&self) -> bool {
        self.is_error.unwrap_or(false)
    }

    /// Normalize a handler's return value.
    ///
    /// Values already shaped like `{content: [{type, ...}, ...]}` pass
    /// through; items that are not text keep their full structure
    /// serialized into `text`. Strings become a single text item, whole
    /// floats print without a fraction and anything else is serialized to
    /// JSON text.
    pub fn from_value(value: Value) -> Self {
        if let Some(result) = Self::from_content_shape(&value) {
            return result;
        }
        match value {
            Value::String(s) => Self::text(s),
            Value::Number(n) => Self::text(format_number(&n)),
            other => Self::text(other.to_string()),
        }
    }

    fn from_content_shape(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let items = obj.get("content")?.as_array()?;

        let content = items
            .iter()
            .map(|item| {
                let kind = item.get("type")?.as_str()?;
                match (kind, item.get("text").and_then(Value::as_str)) {
                    ("text", Some(text)) => Some(ContentItem::text(text)),
                    _ => Some(ContentItem {
                        content_type: kind.to_string(),
                        text: item.to_string(),
                    }),
                }
            })
            .collect::<Option<Vec<_>>>()?;

        Some(Self {
            content,
            is_error: obj.get("isError").and_then(Value::as_bool),
        })
    }
}

fn format_number(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

/// Outcome of checking arguments without running the tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ValidationIssue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ValidationResult {
    /// Arguments accepted; `data` holds the coerced arguments.
    pub fn valid(data: Value) -> Self {
        Self {
            is_valid: true,
            errors: None,
            data: Some(data),
        }
    }

    /// Arguments rejected.
    pub fn invalid(errors: Vec<ValidationIssue>) -> Self {
        Self {
            is_valid: false,
            errors: Some(errors),
            data: None,
        }
    }
}
