//! Tools domain module.
//!
//! Tools are methods of a service exported to MCP clients. A call flows
//! through four stages:
//!
//! - `validator.rs` - Runtime validators, built in code or loaded from a
//!   tagged JSON description
//! - `schema.rs` - Translation of validators into JSON Schema fragments
//! - `metadata.rs` - Per-registry store of tool and parameter annotations,
//!   and the parameter extraction that merges them with declared signatures
//! - `registry.rs` - Registration of services and dispatch of calls
//!
//! Supporting modules:
//!
//! - `service.rs` - The [`ToolService`] trait and its definition builder
//! - `handlers.rs` - Positional [`Arguments`] and the erased handler trait
//! - `executor.rs` - A tool bound to its handler; validates then invokes
//! - `model.rs` - Wire types shared by every transport
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a Service
//!
//! 1. Implement [`ToolService`] for the type; describe each exported method
//!    with `tools.method(..).tool(..)` and bind a handler
//! 2. Register an instance with [`ToolRegistry::register`] (or through the
//!    server builder)

mod error;
mod executor;
mod handlers;
mod metadata;
mod model;
mod registry;
mod schema;
mod service;
mod validator;

pub use error::{RegistrationError, ToolError, ToolFailure};
pub use executor::{ToolDescriptor, ToolExecutor};
pub use handlers::{ArgumentError, Arguments, ToolHandler};
pub use metadata::{
    DeclaredType, ExtractedParameters, MetadataStore, MethodKey, ParamAnnotation,
    ParameterDescriptor, ToolAnnotation,
};
pub use model::{ContentItem, ToolDefinition, ToolResult, ValidationResult};
pub use registry::ToolRegistry;
pub use schema::{JsonSchema, SchemaType, translate};
pub use service::{MethodBuilder, ServiceTools, ToolService};
pub use validator::{
    BoxError, NumberRules, OptionalProbe, Pattern, Shape, StringRules, ValidationErrors,
    ValidationIssue, Validator,
};
