//! Tool executors.
//!
//! A [`ToolExecutor`] couples a [`ToolDescriptor`] with the handler bound at
//! registration. Executing it validates the raw arguments, invokes the
//! handler with positional values and normalizes the return value.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use super::error::ToolError;
use super::handlers::{Arguments, ToolHandler};
use super::metadata::ParameterDescriptor;
use super::model::{ToolDefinition, ToolResult};
use super::schema::JsonSchema;
use super::validator::{ValidationErrors, ValidationIssue, Validator};

/// Immutable description of one tool.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    /// Unique tool name.
    pub name: String,
    /// Description shown to clients.
    pub description: String,
    /// Parameters in positional order.
    pub parameters: Vec<ParameterDescriptor>,
    /// Names of the required parameters, in positional order.
    pub required: Vec<String>,
}

impl ToolDescriptor {
    /// Build a descriptor; the required list is derived from `parameters`.
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Vec<ParameterDescriptor>) -> Self {
        let required = parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.clone())
            .collect();
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            required,
        }
    }

    /// The object schema of the tool's arguments.
    pub fn input_schema(&self) -> JsonSchema {
        JsonSchema::object(
            self.parameters
                .iter()
                .map(|p| (p.name.clone(), p.schema.clone()))
                .collect(),
            self.required.clone(),
        )
    }

    /// The definition advertised to clients.
    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.clone(),
            description: Some(self.description.clone()),
            input_schema: self.input_schema(),
        }
    }
}

/// A tool bound to its handler.
pub struct ToolExecutor {
    descriptor: ToolDescriptor,
    handler: Arc<dyn ToolHandler>,
    validators: Vec<Option<Validator>>,
}

impl std::fmt::Debug for ToolExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolExecutor")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

impl ToolExecutor {
    /// Bind `descriptor` to `handler`.
    pub fn new(descriptor: ToolDescriptor, handler: Arc<dyn ToolHandler>) -> Self {
        let validators = descriptor
            .parameters
            .iter()
            .map(|p| p.validator.clone())
            .collect();
        Self {
            descriptor,
            handler,
            validators,
        }
    }

    /// The tool's descriptor.
    pub fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    /// The tool's name.
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Validate raw arguments into positional values.
    ///
    /// Parameters with a validator are checked and coerced; every issue is
    /// collected. Parameters without one pass through unchecked, with
    /// missing values as `null`.
    pub fn validate(&self, raw: &Value) -> Result<Arguments, ValidationErrors> {
        let empty = Map::new();
        let args = match raw {
            Value::Object(map) => map,
            Value::Null => &empty,
            other => {
                return Err(ValidationErrors(vec![ValidationIssue::new(
                    "",
                    format!("Expected an object of named arguments, received {other}"),
                    "invalid_type",
                )]));
            }
        };

        let mut names = Vec::with_capacity(self.descriptor.parameters.len());
        let mut values = Vec::with_capacity(self.descriptor.parameters.len());
        let mut issues = Vec::new();

        for (param, validator) in self.descriptor.parameters.iter().zip(&self.validators) {
            let raw_value = args.get(&param.name);
            let value = match validator {
                Some(validator) => match validator.parse_at(raw_value, &param.name) {
                    Ok(parsed) => parsed.unwrap_or(Value::Null),
                    Err(errors) => {
                        issues.extend(errors.0);
                        Value::Null
                    }
                },
                None => raw_value.cloned().unwrap_or(Value::Null),
            };
            names.push(param.name.clone());
            values.push(value);
        }

        if issues.is_empty() {
            Ok(Arguments::new(names, values))
        } else {
            Err(ValidationErrors(issues))
        }
    }

    /// Validate, invoke and normalize.
    #[instrument(skip_all, fields(tool = %self.descriptor.name))]
    pub async fn execute(&self, raw: &Value) -> Result<ToolResult, ToolError> {
        let arguments = self.validate(raw).map_err(|errors| {
            warn!("Rejected arguments: {}", errors);
            ToolError::validation(&self.descriptor.name, errors)
        })?;

        debug!("Invoking handler with {} argument(s)", arguments.len());

        let outcome = AssertUnwindSafe(self.handler.call(arguments))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(value)) => Ok(ToolResult::from_value(value)),
            Ok(Err(e)) => {
                warn!("Handler failed: {:#}", e);
                Err(ToolError::execution(&self.descriptor.name, e))
            }
            Err(panic) => {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic payload".to_string());
                warn!("Handler panicked: {}", reason);
                Err(ToolError::execution(
                    &self.descriptor.name,
                    anyhow::anyhow!("handler panicked: {reason}"),
                ))
            }
        }
    }
}
