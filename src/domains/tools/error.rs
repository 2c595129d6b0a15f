//! Tool-specific error types.

use serde_json::{Value, json};
use thiserror::Error;
use tracing::warn;

use super::model::ToolResult;
use super::validator::{ValidationErrors, ValidationIssue};

/// Errors raised while building the tool registry.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// Two methods resolve to the same tool name.
    #[error("Duplicate tool name '{name}': defined by {first} and {second}")]
    DuplicateTool {
        name: String,
        first: String,
        second: String,
    },

    /// A method is annotated as a tool but no handler was bound to it.
    #[error("Tool method {service}::{method} has no handler")]
    MissingHandler { service: String, method: String },

    /// Two positions of one tool resolve to the same parameter name.
    #[error("Tool '{tool}' declares parameter '{name}' more than once")]
    DuplicateParameter { tool: String, name: String },
}

impl RegistrationError {
    /// Create a "duplicate tool" error.
    pub fn duplicate(name: impl Into<String>, first: impl Into<String>, second: impl Into<String>) -> Self {
        Self::DuplicateTool {
            name: name.into(),
            first: first.into(),
            second: second.into(),
        }
    }
}

/// Errors that can occur while dispatching a tool call.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// An argument failed its validator.
    #[error("Invalid arguments for tool '{tool}': {errors}")]
    Validation {
        tool: String,
        errors: ValidationErrors,
    },

    /// The handler returned an error or panicked.
    #[error("Tool '{tool}' failed: {source}")]
    Execution {
        tool: String,
        #[source]
        source: anyhow::Error,
    },
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new validation error.
    pub fn validation(tool: impl Into<String>, errors: ValidationErrors) -> Self {
        Self::Validation {
            tool: tool.into(),
            errors,
        }
    }

    /// Create a new "execution failed" error.
    pub fn execution(tool: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Execution {
            tool: tool.into(),
            source,
        }
    }

    /// Path of the first offending argument, for validation errors.
    pub fn path(&self) -> Option<&str> {
        self.first_issue().map(|issue| issue.path.as_str())
    }

    /// Message of the first offending argument, for validation errors.
    pub fn message(&self) -> Option<&str> {
        self.first_issue().map(|issue| issue.message.as_str())
    }

    /// All validation issues; empty for other kinds.
    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            Self::Validation { errors, .. } => errors.issues(),
            _ => &[],
        }
    }

    fn first_issue(&self) -> Option<&ValidationIssue> {
        self.issues().first()
    }

    /// How the failure is reported to the client.
    ///
    /// Unknown tools and rejected arguments are invalid-params request
    /// errors; a failing handler becomes an error result.
    pub fn into_failure(self) -> ToolFailure {
        let data = match &self {
            Self::NotFound(name) => json!({ "tool": name }),
            Self::Validation { tool, errors } => json!({
                "tool": tool,
                "path": self.path(),
                "issues": errors.issues(),
            }),
            Self::Execution { .. } => {
                warn!("{:#}", self);
                return ToolFailure::Result(ToolResult::error(self.to_string()));
            }
        };
        ToolFailure::InvalidParams {
            message: self.to_string(),
            data,
        }
    }
}

/// Client-facing outcome of a failed tool call.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolFailure {
    /// A JSON-RPC invalid-params error with `{tool, path, issues}` data.
    InvalidParams { message: String, data: Value },
    /// A result flagged `isError`.
    Result(ToolResult),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_exposes_first_issue() {
        let err = ToolError::validation(
            "add",
            ValidationErrors(vec![
                ValidationIssue::new("a", "Expected number, received string", "invalid_type"),
                ValidationIssue::new("b", "Required", "invalid_type"),
            ]),
        );
        assert_eq!(err.path(), Some("a"));
        assert_eq!(err.message(), Some("Expected number, received string"));
        assert_eq!(err.issues().len(), 2);
        assert!(err.to_string().contains("a: Expected number"));
    }

    #[test]
    fn test_execution_error_keeps_source() {
        let err = ToolError::execution("div", anyhow::anyhow!("division by zero"));
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "division by zero");
        assert!(err.path().is_none());
    }

    #[test]
    fn test_failure_payloads() {
        let invalid = ToolError::validation(
            "add",
            ValidationErrors(vec![ValidationIssue::new("a", "Required", "invalid_type")]),
        );
        match invalid.into_failure() {
            ToolFailure::InvalidParams { message, data } => {
                assert!(message.starts_with("Invalid arguments for tool 'add'"));
                assert_eq!(data["tool"], json!("add"));
                assert_eq!(data["path"], json!("a"));
                assert_eq!(data["issues"][0]["code"], json!("invalid_type"));
            }
            other => panic!("unexpected failure: {other:?}"),
        }

        assert_eq!(
            ToolError::not_found("nope").into_failure(),
            ToolFailure::InvalidParams {
                message: "Tool not found: nope".to_string(),
                data: json!({ "tool": "nope" }),
            }
        );

        let failed = ToolError::execution("div", anyhow::anyhow!("division by zero"));
        assert_eq!(
            failed.into_failure(),
            ToolFailure::Result(ToolResult::error("Tool 'div' failed: division by zero"))
        );
    }

    #[test]
    fn test_duplicate_message() {
        let err = RegistrationError::duplicate("add", "A::add", "B::add");
        assert_eq!(
            err.to_string(),
            "Duplicate tool name 'add': defined by A::add and B::add"
        );
    }

    #[test]
    fn test_duplicate_parameter_message() {
        let err = RegistrationError::DuplicateParameter {
            tool: "add".to_string(),
            name: "a".to_string(),
        };
        assert_eq!(err.to_string(), "Tool 'add' declares parameter 'a' more than once");
    }
}
