//! JSON Schema generation from validators.
//!
//! [`translate`] is total: every validator, including ones whose shape is
//! unknown, produces a schema node. Unknown shapes degrade to
//! `{"type": "string"}`.
//!
//! Unions translate to their first alternative only. Clients see a single
//! type for the parameter while the runtime check still accepts any
//! alternative.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::validator::{Shape, Validator};

/// The `type` keyword of a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
}

/// A JSON Schema node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonSchema {
    #[serde(rename = "type")]
    pub schema_type: SchemaType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<JsonSchema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, JsonSchema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl JsonSchema {
    /// A bare node of the given type.
    pub fn of(schema_type: SchemaType) -> Self {
        Self {
            schema_type,
            description: None,
            enum_values: None,
            items: None,
            properties: None,
            required: None,
            minimum: None,
            maximum: None,
            min_length: None,
            max_length: None,
            pattern: None,
        }
    }

    /// `{"type": "string"}`, also the fallback for anything unrecognized.
    pub fn string() -> Self {
        Self::of(SchemaType::String)
    }

    /// An array node with the given item schema.
    pub fn array_of(items: JsonSchema) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::of(SchemaType::Array)
        }
    }

    /// An object node with properties and a required list.
    pub fn object(properties: IndexMap<String, JsonSchema>, required: Vec<String>) -> Self {
        Self {
            properties: Some(properties),
            required: Some(required),
            ..Self::of(SchemaType::Object)
        }
    }

    /// Serialize into a JSON object.
    pub fn to_object(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

/// Translate a validator into a JSON Schema node.
///
/// Never fails. Descriptions found along an optional/nullable chain are
/// copied onto the node; the outermost one wins.
pub fn translate(validator: &Validator) -> JsonSchema {
    let mut schema = match validator.shape() {
        Shape::String(rules) => JsonSchema {
            min_length: rules.min_length,
            max_length: rules.max_length,
            pattern: rules.pattern.as_ref().map(|p| p.as_str().to_string()),
            ..JsonSchema::string()
        },
        Shape::Number(rules) => JsonSchema {
            minimum: rules.minimum,
            maximum: rules.maximum,
            ..JsonSchema::of(SchemaType::Number)
        },
        Shape::Integer(rules) => JsonSchema {
            minimum: rules.minimum,
            maximum: rules.maximum,
            ..JsonSchema::of(SchemaType::Integer)
        },
        Shape::Boolean => JsonSchema::of(SchemaType::Boolean),
        Shape::Enum(values) => JsonSchema {
            enum_values: Some(values.clone()),
            ..JsonSchema::string()
        },
        Shape::Array(item) => JsonSchema::array_of(translate(item)),
        Shape::Object(fields) => {
            let mut properties = IndexMap::with_capacity(fields.len());
            let mut required = Vec::new();
            for (key, field) in fields {
                properties.insert(key.clone(), translate(field));
                if !field.is_optional() {
                    required.push(key.clone());
                }
            }
            JsonSchema::object(properties, required)
        }
        Shape::Optional(inner) | Shape::Nullable(inner) => translate(inner),
        Shape::Union(alternatives) => match alternatives.first() {
            Some(first) => translate(first),
            None => JsonSchema::string(),
        },
        Shape::Unknown(tag) => {
            debug!("No schema mapping for validator tag {:?}, using string", tag);
            JsonSchema::string()
        }
    };

    if let Some(description) = validator.description() {
        schema.description = Some(description.to_string());
    }
    schema
}
