//! Tool and parameter metadata.
//!
//! The [`MetadataStore`] holds, per `(service, method)`, the tool-level
//! annotation, the positional parameter annotations and the declared
//! signature of the method. It is owned by a registry; nothing here is
//! global.
//!
//! [`MetadataStore::extract_parameters`] merges those sources into the
//! ordered parameter list a tool advertises.

use std::collections::BTreeMap;

use indexmap::IndexMap;

use super::schema::{JsonSchema, SchemaType, translate};
use super::validator::Validator;

/// Identifies a method of a registered service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodKey {
    /// Type name of the service.
    pub service: String,
    /// Method name as given at definition time.
    pub method: String,
}

impl MethodKey {
    /// Create a new key.
    pub fn new(service: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            method: method.into(),
        }
    }
}

/// Tool-level annotation of a method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolAnnotation {
    /// Exported tool name. Defaults to the method name.
    pub name: Option<String>,
    /// Description shown to clients.
    pub description: String,
}

/// Annotation of one positional parameter.
#[derive(Debug, Clone, Default)]
pub struct ParamAnnotation {
    /// Explicit parameter name.
    pub name: Option<String>,
    /// Validator used for the schema and the runtime check.
    pub validator: Option<Validator>,
    /// Description; takes precedence over the validator's own.
    pub description: Option<String>,
}

/// A declared parameter type, used when no validator is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredType {
    String,
    Number,
    Boolean,
    Object,
    Array,
    /// Anything without a direct schema mapping.
    Other,
}

impl DeclaredType {
    /// Infer a schema for this declared type.
    ///
    /// Arrays get string items: the element type is not declared.
    pub fn infer_schema(self) -> JsonSchema {
        match self {
            Self::String => JsonSchema::string(),
            Self::Number => JsonSchema::of(SchemaType::Number),
            Self::Boolean => JsonSchema::of(SchemaType::Boolean),
            Self::Object => JsonSchema::of(SchemaType::Object),
            Self::Array => JsonSchema::array_of(JsonSchema::string()),
            Self::Other => JsonSchema::string(),
        }
    }
}

/// One resolved parameter of a tool.
#[derive(Debug, Clone)]
pub struct ParameterDescriptor {
    /// Position in the handler's argument list.
    pub index: usize,
    /// Name under which the argument is looked up.
    pub name: String,
    /// Whether the argument must be present.
    pub required: bool,
    /// Advertised schema fragment.
    pub schema: JsonSchema,
    /// Validator enforced at dispatch, if any.
    pub validator: Option<Validator>,
}

/// Result of parameter extraction.
#[derive(Debug, Clone, Default)]
pub struct ExtractedParameters {
    /// Parameters in positional order.
    pub parameters: Vec<ParameterDescriptor>,
}

impl ExtractedParameters {
    /// Property schemas keyed by parameter name, in positional order.
    pub fn properties(&self) -> IndexMap<String, JsonSchema> {
        self.parameters
            .iter()
            .map(|p| (p.name.clone(), p.schema.clone()))
            .collect()
    }

    /// Names of required parameters, in positional order.
    pub fn required(&self) -> Vec<String> {
        self.parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.clone())
            .collect()
    }

    /// Whether no parameters were found.
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
struct MethodMetadata {
    tool: Option<ToolAnnotation>,
    params: BTreeMap<usize, ParamAnnotation>,
    names: Vec<String>,
    types: Vec<DeclaredType>,
}

/// Per-registry storage of method metadata.
#[derive(Debug, Clone, Default)]
pub struct MetadataStore {
    methods: IndexMap<MethodKey, MethodMetadata>,
}

impl MetadataStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the tool annotation of a method, replacing any earlier one.
    pub fn describe_tool(&mut self, key: MethodKey, annotation: ToolAnnotation) {
        self.methods.entry(key).or_default().tool = Some(annotation);
    }

    /// Attach the annotation of parameter `index`, replacing any earlier one.
    pub fn describe_param(&mut self, key: MethodKey, index: usize, annotation: ParamAnnotation) {
        self.methods
            .entry(key)
            .or_default()
            .params
            .insert(index, annotation);
    }

    /// Record the declared parameter names and types of a method.
    pub fn declare_signature(&mut self, key: MethodKey, names: Vec<String>, types: Vec<DeclaredType>) {
        let entry = self.methods.entry(key).or_default();
        entry.names = names;
        entry.types = types;
    }

    /// The tool annotation of a method, if it has one.
    pub fn tool(&self, key: &MethodKey) -> Option<&ToolAnnotation> {
        self.methods.get(key).and_then(|m| m.tool.as_ref())
    }

    /// Methods of `service` that carry a tool annotation, in definition order.
    pub fn tool_methods(&self, service: &str) -> Vec<&MethodKey> {
        self.methods
            .iter()
            .filter(|(key, meta)| key.service == service && meta.tool.is_some())
            .map(|(key, _)| key)
            .collect()
    }

    /// Move every entry of `other` into this store, overwriting equal keys.
    pub fn merge(&mut self, other: MetadataStore) {
        for (key, meta) in other.methods {
            self.methods.insert(key, meta);
        }
    }

    /// Resolve the ordered parameter list of a method.
    ///
    /// For each position an explicit parameter annotation wins; otherwise the
    /// declared type (from `declared_types` when given, else the recorded
    /// signature) is mapped to a schema; otherwise the string fallback is
    /// used. Names come from the annotation, then the signature, then
    /// `arg{index}`. A method the store knows nothing about yields an empty
    /// result.
    pub fn extract_parameters(
        &self,
        key: &MethodKey,
        declared_types: Option<&[DeclaredType]>,
    ) -> ExtractedParameters {
        let Some(meta) = self.methods.get(key) else {
            return ExtractedParameters::default();
        };

        let types = declared_types.unwrap_or(&meta.types);
        let annotated = meta.params.keys().next_back().map_or(0, |last| last + 1);
        let count = annotated.max(types.len()).max(meta.names.len());

        let parameters = (0..count)
            .map(|index| {
                let annotation = meta.params.get(&index);
                let name = annotation
                    .and_then(|a| a.name.clone())
                    .or_else(|| meta.names.get(index).cloned())
                    .unwrap_or_else(|| format!("arg{index}"));

                let validator = annotation.and_then(|a| a.validator.clone());
                let (mut schema, required) = match &validator {
                    Some(v) => (translate(v), !v.is_optional()),
                    None => (
                        types
                            .get(index)
                            .map_or_else(JsonSchema::string, |t| t.infer_schema()),
                        true,
                    ),
                };
                if let Some(description) = annotation.and_then(|a| a.description.clone()) {
                    schema.description = Some(description);
                }

                ParameterDescriptor {
                    index,
                    name,
                    required,
                    schema,
                    validator,
                }
            })
            .collect();

        ExtractedParameters { parameters }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> MethodKey {
        MethodKey::new("Calc", "add")
    }

    #[test]
    fn test_unknown_method_yields_empty() {
        let store = MetadataStore::new();
        let extracted = store.extract_parameters(&key(), None);
        assert!(extracted.is_empty());
        assert!(extracted.properties().is_empty());
        assert!(extracted.required().is_empty());

        let with_types = store.extract_parameters(&key(), Some(&[DeclaredType::String, DeclaredType::Number]));
        assert!(with_types.is_empty());
    }

    #[test]
    fn test_annotations_win_over_declared_types() {
        let mut store = MetadataStore::new();
        store.declare_signature(
            key(),
            vec!["a".into(), "b".into()],
            vec![DeclaredType::String, DeclaredType::String],
        );
        store.describe_param(
            key(),
            0,
            ParamAnnotation {
                validator: Some(Validator::number()),
                description: Some("first".into()),
                ..Default::default()
            },
        );

        let extracted = store.extract_parameters(&key(), None);
        let props = extracted.properties();
        assert_eq!(props["a"].schema_type, SchemaType::Number);
        assert_eq!(props["a"].description.as_deref(), Some("first"));
        assert_eq!(props["b"].schema_type, SchemaType::String);
        assert_eq!(extracted.required(), vec!["a", "b"]);
        assert!(extracted.parameters[0].validator.is_some());
        assert!(extracted.parameters[1].validator.is_none());
    }

    #[test]
    fn test_declared_type_inference() {
        assert_eq!(DeclaredType::Number.infer_schema(), JsonSchema::of(SchemaType::Number));
        assert_eq!(DeclaredType::Object.infer_schema(), JsonSchema::of(SchemaType::Object));
        assert_eq!(
            DeclaredType::Array.infer_schema(),
            JsonSchema::array_of(JsonSchema::string())
        );
        assert_eq!(DeclaredType::Other.infer_schema(), JsonSchema::string());
    }

    #[test]
    fn test_explicit_declared_types_override_signature() {
        let mut store = MetadataStore::new();
        store.declare_signature(key(), vec!["x".into()], vec![DeclaredType::String]);

        let extracted = store.extract_parameters(&key(), Some(&[DeclaredType::Boolean, DeclaredType::Array]));
        let names: Vec<_> = extracted.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["x", "arg1"]);
        assert_eq!(extracted.parameters[0].schema.schema_type, SchemaType::Boolean);
        assert_eq!(extracted.parameters[1].schema.schema_type, SchemaType::Array);
    }

    #[test]
    fn test_optional_validator_not_required_and_order_kept() {
        let mut store = MetadataStore::new();
        for (i, (name, v)) in [
            ("q", Validator::string()),
            ("limit", Validator::integer().optional()),
            ("mode", Validator::enumeration(["a", "b"])),
        ]
        .into_iter()
        .enumerate()
        {
            store.describe_param(
                key(),
                i,
                ParamAnnotation {
                    name: Some(name.into()),
                    validator: Some(v),
                    description: None,
                },
            );
        }

        let extracted = store.extract_parameters(&key(), None);
        assert_eq!(extracted.required(), vec!["q", "mode"]);
        let keys: Vec<_> = extracted.properties().keys().cloned().collect();
        assert_eq!(keys, vec!["q", "limit", "mode"]);
    }

    #[test]
    fn test_gap_positions_fall_back_to_placeholders() {
        let mut store = MetadataStore::new();
        store.describe_param(
            key(),
            2,
            ParamAnnotation {
                name: Some("c".into()),
                validator: Some(Validator::boolean()),
                description: None,
            },
        );
        let extracted = store.extract_parameters(&key(), None);
        let names: Vec<_> = extracted.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["arg0", "arg1", "c"]);
        assert_eq!(extracted.parameters[0].schema, JsonSchema::string());
    }

    #[test]
    fn test_later_attachment_overwrites() {
        let mut store = MetadataStore::new();
        store.describe_tool(
            key(),
            ToolAnnotation {
                name: None,
                description: "old".into(),
            },
        );
        store.describe_tool(
            key(),
            ToolAnnotation {
                name: Some("plus".into()),
                description: "new".into(),
            },
        );
        store.describe_param(
            key(),
            0,
            ParamAnnotation {
                validator: Some(Validator::string()),
                ..Default::default()
            },
        );
        store.describe_param(
            key(),
            0,
            ParamAnnotation {
                validator: Some(Validator::number()),
                ..Default::default()
            },
        );

        assert_eq!(store.tool(&key()).unwrap().description, "new");
        let extracted = store.extract_parameters(&key(), None);
        assert_eq!(extracted.parameters.len(), 1);
        assert_eq!(extracted.parameters[0].schema.schema_type, SchemaType::Number);
    }

    #[test]
    fn test_tool_methods_filters_by_service_and_annotation() {
        let mut store = MetadataStore::new();
        let annotation = ToolAnnotation {
            name: None,
            description: "d".into(),
        };
        store.describe_tool(MethodKey::new("A", "one"), annotation.clone());
        store.declare_signature(MethodKey::new("A", "helper"), vec![], vec![]);
        store.describe_tool(MethodKey::new("B", "two"), annotation);

        let methods: Vec<_> = store.tool_methods("A").iter().map(|k| k.method.as_str()).collect();
        assert_eq!(methods, vec!["one"]);
    }
}
