//! Validator descriptions.
//!
//! A [`Validator`] describes the shape a tool argument must have. The same
//! description drives two things: the JSON Schema advertised to clients
//! (see [`super::schema::translate`]) and the runtime check/coercion applied
//! to incoming arguments before a handler runs ([`Validator::parse`]).
//!
//! Validators are built fluently:
//!
//! ```rust
//! use mcp_toolkit::domains::tools::Validator;
//!
//! let name = Validator::string().min(3).max(10).pattern("^[a-z]+$");
//! let age = Validator::number().min(0).optional().describe("Age in years");
//! let user = Validator::object([("name", name), ("age", age)]);
//! # let _ = user;
//! ```
//!
//! Validators produced outside this crate can be described as tagged JSON
//! and loaded with [`Validator::from_description`]. Unrecognized tags never
//! fail; they load as [`Shape::Unknown`].

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

/// Boxed error returned by optionality probes.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Capability probe asked whether a validator accepts a missing value.
pub type OptionalProbe = Arc<dyn Fn() -> Result<bool, BoxError> + Send + Sync>;

/// Length and pattern refinements of a string validator.
#[derive(Debug, Clone, Default)]
pub struct StringRules {
    /// Minimum length in characters.
    pub min_length: Option<usize>,
    /// Maximum length in characters.
    pub max_length: Option<usize>,
    /// Regular expression the value must match.
    pub pattern: Option<Pattern>,
}

/// A regular expression kept together with its source text.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Option<Regex>,
}

impl Pattern {
    fn new(source: String) -> Self {
        let regex = match Regex::new(&source) {
            Ok(regex) => Some(regex),
            Err(e) => {
                warn!("Pattern '{}' does not compile and will not be enforced: {}", source, e);
                None
            }
        };
        Self { source, regex }
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

/// Range refinements of a numeric validator.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NumberRules {
    /// Inclusive lower bound.
    pub minimum: Option<f64>,
    /// Inclusive upper bound.
    pub maximum: Option<f64>,
}

/// The structural kind of a validator.
#[derive(Debug, Clone)]
pub enum Shape {
    /// A string, with optional refinements.
    String(StringRules),
    /// Any JSON number.
    Number(NumberRules),
    /// A number without a fractional part.
    Integer(NumberRules),
    /// `true` or `false`.
    Boolean,
    /// One of a fixed list of string literals.
    Enum(Vec<String>),
    /// A homogeneous array.
    Array(Box<Validator>),
    /// An object with named fields, in declaration order.
    Object(IndexMap<String, Validator>),
    /// The inner validator, or no value at all.
    Optional(Box<Validator>),
    /// The inner validator, or `null`. Still required.
    Nullable(Box<Validator>),
    /// The first alternative that accepts the value.
    Union(Vec<Validator>),
    /// A shape this crate cannot interpret. Carries the foreign tag if any.
    Unknown(Option<String>),
}

/// A structured description of an accepted value shape.
#[derive(Clone)]
pub struct Validator {
    shape: Shape,
    description: Option<String>,
    probe: Option<OptionalProbe>,
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("shape", &self.shape)
            .field("description", &self.description)
            .field("probe", &self.probe.as_ref().map(|_| "<probe>"))
            .finish()
    }
}

impl Validator {
    fn from_shape(shape: Shape) -> Self {
        Self {
            shape,
            description: None,
            probe: None,
        }
    }

    /// A string validator.
    pub fn string() -> Self {
        Self::from_shape(Shape::String(StringRules::default()))
    }

    /// A number validator.
    pub fn number() -> Self {
        Self::from_shape(Shape::Number(NumberRules::default()))
    }

    /// An integer validator.
    pub fn integer() -> Self {
        Self::from_shape(Shape::Integer(NumberRules::default()))
    }

    /// A boolean validator.
    pub fn boolean() -> Self {
        Self::from_shape(Shape::Boolean)
    }

    /// A literal enumeration. Order is preserved.
    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_shape(Shape::Enum(values.into_iter().map(Into::into).collect()))
    }

    /// An array whose items all satisfy `item`.
    pub fn array(item: Validator) -> Self {
        Self::from_shape(Shape::Array(Box::new(item)))
    }

    /// An object with the given fields, in declaration order.
    pub fn object<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Validator)>,
        K: Into<String>,
    {
        Self::from_shape(Shape::Object(
            fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    /// A union of alternatives.
    pub fn union<I>(alternatives: I) -> Self
    where
        I: IntoIterator<Item = Validator>,
    {
        Self::from_shape(Shape::Union(alternatives.into_iter().collect()))
    }

    /// A validator whose shape is not known. Accepts any value.
    pub fn unknown(tag: Option<String>) -> Self {
        Self::from_shape(Shape::Unknown(tag))
    }

    /// Accept any value.
    pub fn any() -> Self {
        Self::unknown(Some("any".to_string()))
    }

    /// Wrap this validator so a missing value is accepted.
    pub fn optional(self) -> Self {
        Self::from_shape(Shape::Optional(Box::new(self)))
    }

    /// Wrap this validator so `null` is accepted.
    pub fn nullable(self) -> Self {
        Self::from_shape(Shape::Nullable(Box::new(self)))
    }

    /// Attach a description.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach an optionality probe.
    pub fn with_probe(mut self, probe: OptionalProbe) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Lower bound: minimum length for strings, minimum value for numbers.
    ///
    /// Applied through optional and nullable wrappers; ignored for other shapes.
    pub fn min(self, bound: impl Into<f64>) -> Self {
        let bound = bound.into();
        self.refine(&|shape| match shape {
            Shape::String(rules) => rules.min_length = Some(length_bound(bound)),
            Shape::Number(rules) | Shape::Integer(rules) => rules.minimum = Some(bound),
            _ => {}
        })
    }

    /// Upper bound: maximum length for strings, maximum value for numbers.
    pub fn max(self, bound: impl Into<f64>) -> Self {
        let bound = bound.into();
        self.refine(&|shape| match shape {
            Shape::String(rules) => rules.max_length = Some(length_bound(bound)),
            Shape::Number(rules) | Shape::Integer(rules) => rules.maximum = Some(bound),
            _ => {}
        })
    }

    /// Require string values to match `pattern`.
    pub fn pattern(self, pattern: impl Into<String>) -> Self {
        let pattern = Pattern::new(pattern.into());
        self.refine(&|shape| {
            if let Shape::String(rules) = shape {
                rules.pattern = Some(pattern.clone());
            }
        })
    }

    fn refine(mut self, apply: &dyn Fn(&mut Shape)) -> Self {
        match &mut self.shape {
            Shape::Optional(inner) | Shape::Nullable(inner) => {
                let refined = std::mem::replace(inner.as_mut(), Validator::unknown(None)).refine(apply);
                **inner = refined;
            }
            shape => apply(shape),
        }
        self
    }

    /// The structural kind of this validator.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// The description attached at this level, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Whether a missing value is acceptable.
    ///
    /// True when the shape is [`Shape::Optional`] or the attached probe
    /// reports optional. A failing probe counts as not optional.
    pub fn is_optional(&self) -> bool {
        if matches!(self.shape, Shape::Optional(_)) {
            return true;
        }
        match &self.probe {
            Some(probe) => match probe() {
                Ok(optional) => optional,
                Err(e) => {
                    debug!("Optionality probe failed, treating as required: {}", e);
                    false
                }
            },
            None => false,
        }
    }

    // ========================================================================
    // Foreign descriptions
    // ========================================================================

    /// Load a validator from a tagged JSON description.
    ///
    /// The tag is read from `"kind"` or `"typeName"`. Tags may be plain
    /// (`"string"`) or prefixed the way some validation libraries name their
    /// types (`"ZodString"`). Anything else, including non-objects, loads as
    /// [`Shape::Unknown`].
    pub fn from_description(description: &Value) -> Self {
        let Some(obj) = description.as_object() else {
            return Self::unknown(None);
        };

        let tag = obj
            .get("kind")
            .or_else(|| obj.get("typeName"))
            .and_then(Value::as_str);

        let shape = match tag.map(normalize_tag).as_deref() {
            Some("string") => Shape::String(StringRules {
                min_length: read_usize(obj, "minLength"),
                max_length: read_usize(obj, "maxLength"),
                pattern: obj
                    .get("pattern")
                    .and_then(Value::as_str)
                    .map(|p| Pattern::new(p.to_string())),
            }),
            Some("number") => Shape::Number(read_number_rules(obj)),
            Some("integer") => Shape::Integer(read_number_rules(obj)),
            Some("boolean") => Shape::Boolean,
            Some("enum") => Shape::Enum(
                obj.get("values")
                    .and_then(Value::as_array)
                    .map(|values| {
                        values
                            .iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default(),
            ),
            Some("array") => Shape::Array(Box::new(read_inner(obj, "items"))),
            Some("object") => Shape::Object(
                obj.get("properties")
                    .and_then(Value::as_object)
                    .map(|props| {
                        props
                            .iter()
                            .map(|(k, v)| (k.clone(), Self::from_description(v)))
                            .collect()
                    })
                    .unwrap_or_default(),
            ),
            Some("optional") => Shape::Optional(Box::new(read_inner(obj, "innerType"))),
            Some("nullable") => Shape::Nullable(Box::new(read_inner(obj, "innerType"))),
            Some("union") => Shape::Union(
                obj.get("options")
                    .and_then(Value::as_array)
                    .map(|options| options.iter().map(Self::from_description).collect())
                    .unwrap_or_default(),
            ),
            _ => Shape::Unknown(tag.map(str::to_string)),
        };

        let mut validator = Self::from_shape(shape);
        if let Some(text) = obj.get("description").and_then(Value::as_str) {
            validator.description = Some(text.to_string());
        }
        if let Some(flag) = obj.get("isOptional").cloned() {
            validator.probe = Some(Arc::new(move || match &flag {
                Value::Bool(optional) => Ok(*optional),
                other => Err(format!("isOptional is not a boolean: {other}").into()),
            }));
        }
        validator
    }

    // ========================================================================
    // Runtime checking
    // ========================================================================

    /// Check `value` and return its coerced form.
    ///
    /// Every violation is collected; paths are rooted at the value itself.
    pub fn parse(&self, value: &Value) -> Result<Value, ValidationErrors> {
        self.parse_at(Some(value), "")
            .map(|parsed| parsed.unwrap_or(Value::Null))
    }

    /// Check a possibly-missing value, rooting issue paths at `path`.
    ///
    /// Returns `Ok(None)` when the value is absent and that is acceptable.
    pub fn parse_at(&self, value: Option<&Value>, path: &str) -> Result<Option<Value>, ValidationErrors> {
        let mut issues = Vec::new();
        let parsed = self.check(value, path, &mut issues);
        if issues.is_empty() {
            Ok(parsed)
        } else {
            Err(ValidationErrors(issues))
        }
    }

    fn check(&self, value: Option<&Value>, path: &str, issues: &mut Vec<ValidationIssue>) -> Option<Value> {
        let Some(value) = value else {
            if !self.is_optional() {
                issues.push(ValidationIssue::new(path, "Required", "invalid_type"));
            }
            return None;
        };

        match &self.shape {
            Shape::Optional(inner) => inner.check(Some(value), path, issues),
            Shape::Nullable(inner) => {
                if value.is_null() {
                    Some(Value::Null)
                } else {
                    inner.check(Some(value), path, issues)
                }
            }
            Shape::String(rules) => check_string(rules, value, path, issues),
            Shape::Number(rules) => check_number(rules, value, false, path, issues),
            Shape::Integer(rules) => check_number(rules, value, true, path, issues),
            Shape::Boolean => match value {
                Value::Bool(_) => Some(value.clone()),
                other => {
                    issues.push(type_issue(path, "boolean", other));
                    None
                }
            },
            Shape::Enum(values) => match value.as_str() {
                Some(s) if values.iter().any(|v| v == s) => Some(value.clone()),
                _ => {
                    issues.push(ValidationIssue::new(
                        path,
                        format!(
                            "Invalid enum value. Expected {}, received {}",
                            values
                                .iter()
                                .map(|v| format!("'{v}'"))
                                .collect::<Vec<_>>()
                                .join(" | "),
                            value
                        ),
                        "invalid_enum_value",
                    ));
                    None
                }
            },
            Shape::Array(item) => {
                let Some(elements) = value.as_array() else {
                    issues.push(type_issue(path, "array", value));
                    return None;
                };
                let parsed: Vec<Value> = elements
                    .iter()
                    .enumerate()
                    .map(|(i, element)| {
                        item.check(Some(element), &join_path(path, &i.to_string()), issues)
                            .unwrap_or(Value::Null)
                    })
                    .collect();
                Some(Value::Array(parsed))
            }
            Shape::Object(fields) => {
                let Some(obj) = value.as_object() else {
                    issues.push(type_issue(path, "object", value));
                    return None;
                };
                let mut parsed = Map::new();
                for (key, field) in fields {
                    if let Some(v) = field.check(obj.get(key), &join_path(path, key), issues) {
                        parsed.insert(key.clone(), v);
                    }
                }
                Some(Value::Object(parsed))
            }
            Shape::Union(alternatives) => {
                for alternative in alternatives {
                    let mut scratch = Vec::new();
                    let parsed = alternative.check(Some(value), path, &mut scratch);
                    if scratch.is_empty() {
                        return parsed;
                    }
                }
                issues.push(ValidationIssue::new(
                    path,
                    "Invalid input: value matches none of the union alternatives",
                    "invalid_union",
                ));
                None
            }
            Shape::Unknown(_) => Some(value.clone()),
        }
    }
}

fn check_string(
    rules: &StringRules,
    value: &Value,
    path: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Option<Value> {
    let Some(s) = value.as_str() else {
        issues.push(type_issue(path, "string", value));
        return None;
    };

    let len = s.chars().count();
    let before = issues.len();
    if let Some(min) = rules.min_length
        && len < min
    {
        issues.push(ValidationIssue::new(
            path,
            format!("String must contain at least {min} character(s)"),
            "too_small",
        ));
    }
    if let Some(max) = rules.max_length
        && len > max
    {
        issues.push(ValidationIssue::new(
            path,
            format!("String must contain at most {max} character(s)"),
            "too_big",
        ));
    }
    if let Some(pattern) = &rules.pattern
        && let Some(regex) = &pattern.regex
        && !regex.is_match(s)
    {
        issues.push(ValidationIssue::new(
            path,
            format!("String does not match pattern {}", pattern.as_str()),
            "invalid_string",
        ));
    }

    (issues.len() == before).then(|| value.clone())
}

fn check_number(
    rules: &NumberRules,
    value: &Value,
    integer: bool,
    path: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Option<Value> {
    let expected = if integer { "integer" } else { "number" };
    let Some(n) = value.as_f64() else {
        issues.push(type_issue(path, expected, value));
        return None;
    };

    let before = issues.len();
    if integer && n.fract() != 0.0 {
        issues.push(ValidationIssue::new(
            path,
            "Expected integer, received float",
            "invalid_type",
        ));
    }
    if let Some(min) = rules.minimum
        && n < min
    {
        issues.push(ValidationIssue::new(
            path,
            format!("Number must be greater than or equal to {min}"),
            "too_small",
        ));
    }
    if let Some(max) = rules.maximum
        && n > max
    {
        issues.push(ValidationIssue::new(
            path,
            format!("Number must be less than or equal to {max}"),
            "too_big",
        ));
    }

    (issues.len() == before).then(|| value.clone())
}

fn type_issue(path: &str, expected: &str, received: &Value) -> ValidationIssue {
    ValidationIssue::new(
        path,
        format!("Expected {expected}, received {}", json_type_name(received)),
        "invalid_type",
    )
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Append a segment to a dotted issue path.
pub(crate) fn join_path(path: &str, segment: &str) -> String {
    if path.is_empty() {
        segment.to_string()
    } else {
        format!("{path}.{segment}")
    }
}

fn length_bound(bound: f64) -> usize {
    if bound <= 0.0 { 0 } else { bound as usize }
}

fn normalize_tag(tag: &str) -> String {
    tag.strip_prefix("Zod").unwrap_or(tag).to_lowercase()
}

fn read_usize(obj: &Map<String, Value>, key: &str) -> Option<usize> {
    obj.get(key)
        .and_then(Value::as_u64)
        .and_then(|n| usize::try_from(n).ok())
}

fn read_number_rules(obj: &Map<String, Value>) -> NumberRules {
    NumberRules {
        minimum: obj.get("minimum").and_then(Value::as_f64),
        maximum: obj.get("maximum").and_then(Value::as_f64),
    }
}

fn read_inner(obj: &Map<String, Value>, key: &str) -> Validator {
    obj.get(key)
        .map(Validator::from_description)
        .unwrap_or_else(|| Validator::unknown(None))
}

// ============================================================================
// Validation issues
// ============================================================================

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Dotted path to the offending value, rooted at the parameter name.
    pub path: String,
    /// Human-readable reason.
    pub message: String,
    /// Machine-readable issue code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ValidationIssue {
    /// Create a new issue.
    pub fn new(path: impl Into<String>, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            code: Some(code.into()),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// All issues found while checking one value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", join_issues(.0))]
pub struct ValidationErrors(pub Vec<ValidationIssue>);

impl ValidationErrors {
    /// The first issue found.
    pub fn first(&self) -> Option<&ValidationIssue> {
        self.0.first()
    }

    /// All issues, in discovery order.
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.0
    }
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_refinements_all_enforced() {
        let v = Validator::string().min(3).max(5).pattern("^[a-z]+$");

        assert_eq!(v.parse(&json!("abcd")).unwrap(), json!("abcd"));

        let err = v.parse(&json!("AB")).unwrap_err();
        let codes: Vec<_> = err.issues().iter().filter_map(|i| i.code.as_deref()).collect();
        assert_eq!(codes, vec!["too_small", "invalid_string"]);

        assert!(v.parse(&json!("abcdefg")).is_err());
        assert!(v.parse(&json!(12)).is_err());
    }

    #[test]
    fn test_number_bounds() {
        let v = Validator::number().min(0).max(100);
        assert!(v.parse(&json!(0)).is_ok());
        assert!(v.parse(&json!(99.5)).is_ok());
        assert!(v.parse(&json!(-1)).is_err());
        assert!(v.parse(&json!(101)).is_err());
        assert!(v.parse(&json!("5")).is_err());
    }

    #[test]
    fn test_integer_rejects_fraction() {
        let v = Validator::integer();
        assert!(v.parse(&json!(3)).is_ok());
        assert!(v.parse(&json!(3.5)).is_err());
    }

    #[test]
    fn test_enum_membership() {
        let v = Validator::enumeration(["red", "green", "blue"]);
        assert!(v.parse(&json!("green")).is_ok());
        let err = v.parse(&json!("purple")).unwrap_err();
        assert_eq!(err.first().unwrap().code.as_deref(), Some("invalid_enum_value"));
    }

    #[test]
    fn test_object_strips_unknown_keys_and_reports_nested_paths() {
        let v = Validator::object([
            ("name", Validator::string()),
            ("tags", Validator::array(Validator::string()).optional()),
        ]);

        let parsed = v.parse(&json!({"name": "x", "extra": true})).unwrap();
        assert_eq!(parsed, json!({"name": "x"}));

        let err = v.parse(&json!({"tags": ["a", 1]})).unwrap_err();
        let paths: Vec<_> = err.issues().iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["name", "tags.1"]);
    }

    #[test]
    fn test_optional_and_nullable_differ() {
        let optional = Validator::string().optional();
        let nullable = Validator::string().nullable();

        assert_eq!(optional.parse_at(None, "p").unwrap(), None);
        assert!(optional.parse(&Value::Null).is_err());

        assert!(nullable.parse_at(None, "p").is_err());
        assert_eq!(nullable.parse(&Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn test_union_first_accepting_alternative() {
        let v = Validator::union([Validator::number(), Validator::string()]);
        assert_eq!(v.parse(&json!("a")).unwrap(), json!("a"));
        assert_eq!(v.parse(&json!(1)).unwrap(), json!(1));
        let err = v.parse(&json!(true)).unwrap_err();
        assert_eq!(err.first().unwrap().code.as_deref(), Some("invalid_union"));
    }

    #[test]
    fn test_refinements_reach_through_wrappers() {
        let v = Validator::string().optional().min(2);
        assert!(v.is_optional());
        assert!(v.parse(&json!("a")).is_err());
        assert!(v.parse(&json!("ab")).is_ok());
    }

    #[test]
    fn test_probe_controls_optionality() {
        let yes = Validator::string().with_probe(Arc::new(|| Ok(true)));
        let no = Validator::string().with_probe(Arc::new(|| Ok(false)));
        let broken = Validator::string().with_probe(Arc::new(|| Err("probe exploded".into())));

        assert!(yes.is_optional());
        assert!(!no.is_optional());
        assert!(!broken.is_optional());
        assert!(!Validator::string().nullable().is_optional());
    }

    #[test]
    fn test_from_description_known_tags() {
        let v = Validator::from_description(&json!({"typeName": "ZodString", "minLength": 2}));
        assert!(matches!(v.shape(), Shape::String(rules) if rules.min_length == Some(2)));

        let v = Validator::from_description(&json!({
            "kind": "optional",
            "innerType": {"kind": "number"}
        }));
        assert!(v.is_optional());
        assert!(matches!(v.shape(), Shape::Optional(inner) if matches!(inner.shape(), Shape::Number(_))));
    }

    #[test]
    fn test_from_description_unknown_inputs() {
        for desc in [json!({}), json!(null), json!("string"), json!({"typeName": "ZodMystery"})] {
            let v = Validator::from_description(&desc);
            assert!(matches!(v.shape(), Shape::Unknown(_)));
            assert!(v.parse(&json!({"anything": 1})).is_ok());
        }
    }

    #[test]
    fn test_from_description_is_optional_flag() {
        let optional = Validator::from_description(&json!({"typeName": "ZodString", "isOptional": true}));
        let garbage = Validator::from_description(&json!({"typeName": "ZodString", "isOptional": "yes"}));
        assert!(optional.is_optional());
        assert!(!garbage.is_optional());
    }

    #[test]
    fn test_invalid_pattern_is_not_enforced() {
        let v = Validator::string().pattern("([unclosed");
        assert!(v.parse(&json!("anything")).is_ok());
    }
}
