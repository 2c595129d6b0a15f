//! Tool Registry - registration and dispatch of service tools.
//!
//! This module provides:
//! - Registration of [`ToolService`] instances, all-or-nothing per service
//! - Tool listing for every transport
//! - Dispatch of tool calls by name, with argument validation

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::error::{RegistrationError, ToolError};
use super::executor::{ToolDescriptor, ToolExecutor};
use super::handlers::{BoundMethod, ToolHandler};
use super::metadata::MetadataStore;
use super::model::{ToolDefinition, ToolResult, ValidationResult};
use super::service::{ServiceTools, ToolService};

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - owns every registered tool.
///
/// Each registry carries its own [`MetadataStore`]; two registries never
/// see each other's tools.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    store: MetadataStore,
    executors: IndexMap<String, Arc<ToolExecutor>>,
    origins: HashMap<String, String>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every tool method of `service`.
    ///
    /// Returns the number of tools added.
    pub fn register<S: ToolService>(&mut self, service: S) -> Result<usize, RegistrationError> {
        self.register_arc(Arc::new(service))
    }

    /// Register a shared service instance.
    ///
    /// Nothing is added if any tool of the service collides with an existing
    /// tool or with another tool of the same service, lacks a handler, or
    /// names two of its parameters alike.
    pub fn register_arc<S: ToolService>(&mut self, instance: Arc<S>) -> Result<usize, RegistrationError> {
        let mut scratch = MetadataStore::new();
        let mut tools = ServiceTools::<S>::new(&mut scratch);
        S::define_tools(&mut tools);
        let (service, mut handlers) = tools.into_handlers();

        let mut pending: IndexMap<String, (String, Arc<ToolExecutor>)> = IndexMap::new();
        for key in scratch.tool_methods(&service) {
            let Some(annotation) = scratch.tool(key) else {
                continue;
            };
            let name = annotation.name.clone().unwrap_or_else(|| key.method.clone());
            let origin = format!("{}::{}", key.service, key.method);

            let existing = self
                .origins
                .get(&name)
                .or_else(|| pending.get(&name).map(|(first, _)| first));
            if let Some(first) = existing {
                return Err(RegistrationError::duplicate(name, first.clone(), origin));
            }

            let method = handlers.swap_remove(&key.method).ok_or_else(|| {
                RegistrationError::MissingHandler {
                    service: key.service.clone(),
                    method: key.method.clone(),
                }
            })?;

            let parameters = scratch.extract_parameters(key, None).parameters;
            let clash = {
                let mut seen = HashSet::new();
                parameters
                    .iter()
                    .find(|p| !seen.insert(p.name.as_str()))
                    .map(|p| p.name.clone())
            };
            if let Some(param) = clash {
                return Err(RegistrationError::DuplicateParameter { tool: name, name: param });
            }
            let descriptor = ToolDescriptor::new(name.clone(), annotation.description.clone(), parameters);
            let handler: Arc<dyn ToolHandler> = Arc::new(BoundMethod::new(instance.clone(), method));

            debug!("Prepared tool '{}' from {}", name, origin);
            pending.insert(name, (origin, Arc::new(ToolExecutor::new(descriptor, handler))));
        }

        for method in handlers.keys() {
            debug!("Method {}::{} has a handler but is not a tool", service, method);
        }

        let count = pending.len();
        self.store.merge(scratch);
        for (name, (origin, executor)) in pending {
            self.origins.insert(name.clone(), origin);
            self.executors.insert(name, executor);
        }

        info!("Registered {} tool(s) from {}", count, service);
        Ok(count)
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<ToolExecutor>> {
        self.executors.get(name).cloned()
    }

    /// Get all tool names, in registration order.
    pub fn tool_names(&self) -> Vec<&str> {
        self.executors.keys().map(String::as_str).collect()
    }

    /// Get all tool definitions, in registration order.
    ///
    /// This is the single source of truth for all transports.
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        self.executors
            .values()
            .map(|executor| executor.descriptor().definition())
            .collect()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.executors.len()
    }

    /// Whether no tools are registered.
    pub fn is_empty(&self) -> bool {
        self.executors.is_empty()
    }

    /// Metadata of every registered service.
    pub fn metadata(&self) -> &MetadataStore {
        &self.store
    }

    /// Dispatch a tool call.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<ToolResult, ToolError> {
        let executor = self.lookup(name)?;
        executor.execute(&arguments).await
    }

    /// Check arguments against a tool's validators without running it.
    ///
    /// `data` holds the coerced values of the arguments that were supplied.
    pub fn validate_arguments(&self, name: &str, arguments: &Value) -> Result<ValidationResult, ToolError> {
        let executor = self.lookup(name)?;
        let result = match executor.validate(arguments) {
            Ok(validated) => {
                let data: Map<String, Value> = (0..validated.len())
                    .filter_map(|index| {
                        let name = validated.name(index)?;
                        arguments.get(name)?;
                        Some((name.to_string(), validated.value(index)?.clone()))
                    })
                    .collect();
                ValidationResult::valid(Value::Object(data))
            }
            Err(errors) => ValidationResult::invalid(errors.0),
        };
        Ok(result)
    }

    fn lookup(&self, name: &str) -> Result<Arc<ToolExecutor>, ToolError> {
        self.get(name).ok_or_else(|| {
            warn!("Unknown tool requested: {}", name);
            ToolError::not_found(name)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::{Arguments, DeclaredType, ParamAnnotation, Validator};
    use serde_json::json;

    struct Calc;

    impl ToolService for Calc {
        fn define_tools(tools: &mut ServiceTools<'_, Self>) {
            tools
                .method("add")
                .tool("Add two numbers")
                .param(0, "a", Validator::number())
                .param(1, "b", Validator::number())
                .sync_handler(|_: &Calc, args: Arguments| {
                    Ok::<_, anyhow::Error>(args.get::<f64>(0)? + args.get::<f64>(1)?)
                });
            tools
                .method("label")
                .tool_named("make_label", "Label a value")
                .signature(["text", "count"], [DeclaredType::String, DeclaredType::Number])
                .handler(|_: Arc<Calc>, args: Arguments| async move {
                    let text: String = args.get(0)?;
                    let count: f64 = args.get(1)?;
                    Ok::<_, anyhow::Error>(format!("{text} x{count}"))
                });
        }
    }

    struct Clash;

    impl ToolService for Clash {
        fn define_tools(tools: &mut ServiceTools<'_, Self>) {
            tools
                .method("fresh")
                .tool("Would be fine alone")
                .sync_handler(|_: &Clash, _args: Arguments| Ok::<_, anyhow::Error>("fresh"));
            tools
                .method("add")
                .tool("Collides with Calc::add")
                .sync_handler(|_: &Clash, _args: Arguments| Ok::<_, anyhow::Error>(0));
        }
    }

    struct SelfClash;

    impl ToolService for SelfClash {
        fn define_tools(tools: &mut ServiceTools<'_, Self>) {
            tools
                .method("one")
                .tool_named("same", "First")
                .sync_handler(|_: &SelfClash, _args: Arguments| Ok::<_, anyhow::Error>(1));
            tools
                .method("two")
                .tool_named("same", "Second")
                .sync_handler(|_: &SelfClash, _args: Arguments| Ok::<_, anyhow::Error>(2));
        }
    }

    struct Repeated;

    impl ToolService for Repeated {
        fn define_tools(tools: &mut ServiceTools<'_, Self>) {
            tools
                .method("ok")
                .tool("Fine on its own")
                .sync_handler(|_: &Repeated, _args: Arguments| Ok::<_, anyhow::Error>("ok"));
            tools
                .method("twice")
                .tool("Two parameters called a")
                .param(0, "a", Validator::number())
                .param(1, "a", Validator::string())
                .sync_handler(|_: &Repeated, _args: Arguments| Ok::<_, anyhow::Error>(0));
        }
    }

    struct Shadowed;

    impl ToolService for Shadowed {
        fn define_tools(tools: &mut ServiceTools<'_, Self>) {
            tools
                .method("shadow")
                .tool("Explicit name matches a placeholder")
                .param(0, "arg1", Validator::string())
                .param_annotation(
                    1,
                    ParamAnnotation {
                        name: None,
                        validator: Some(Validator::number()),
                        description: None,
                    },
                )
                .sync_handler(|_: &Shadowed, _args: Arguments| Ok::<_, anyhow::Error>(0));
        }
    }

    struct Unbound;

    impl ToolService for Unbound {
        fn define_tools(tools: &mut ServiceTools<'_, Self>) {
            tools.method("orphan").tool("No handler");
        }
    }

    fn calc_registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        assert_eq!(registry.register(Calc).unwrap(), 2);
        registry
    }

    #[test]
    fn test_registry_tool_names() {
        let registry = calc_registry();
        assert_eq!(registry.tool_names(), vec!["add", "make_label"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_list_tools_schemas() {
        let registry = calc_registry();
        let tools = serde_json::to_value(registry.list_tools()).unwrap();
        assert_eq!(
            tools[0],
            json!({
                "name": "add",
                "description": "Add two numbers",
                "inputSchema": {
                    "type": "object",
                    "properties": {"a": {"type": "number"}, "b": {"type": "number"}},
                    "required": ["a", "b"]
                }
            })
        );
        assert_eq!(
            tools[1]["inputSchema"]["properties"],
            json!({"text": {"type": "string"}, "count": {"type": "number"}})
        );
    }

    #[tokio::test]
    async fn test_call_tool_add() {
        let registry = calc_registry();
        let result = registry.call_tool("add", json!({"a": 2, "b": 3})).await.unwrap();
        assert_eq!(result, ToolResult::text("5"));
    }

    #[tokio::test]
    async fn test_call_async_handler() {
        let registry = calc_registry();
        let result = registry
            .call_tool("make_label", json!({"text": "box", "count": 2}))
            .await
            .unwrap();
        assert_eq!(result, ToolResult::text("box x2"));
    }

    #[tokio::test]
    async fn test_registry_call_unknown() {
        let registry = calc_registry();
        let err = registry.call_tool("missing", json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::NotFound(ref name) if name == "missing"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_duplicate_against_existing_is_atomic() {
        let mut registry = calc_registry();
        let err = registry.register(Clash).unwrap_err();
        match err {
            RegistrationError::DuplicateTool { name, first, second } => {
                assert_eq!(name, "add");
                assert!(first.ends_with("Calc::add"));
                assert!(second.ends_with("Clash::add"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(registry.get("fresh").is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_duplicate_within_service() {
        let mut registry = ToolRegistry::new();
        let err = registry.register(SelfClash).unwrap_err();
        assert!(matches!(err, RegistrationError::DuplicateTool { ref name, .. } if name == "same"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_duplicate_parameter_name_rejected() {
        let mut registry = calc_registry();
        let err = registry.register(Repeated).unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::DuplicateParameter { ref tool, ref name } if tool == "twice" && name == "a"
        ));
        assert!(registry.get("ok").is_none());
        assert_eq!(registry.tool_names(), vec!["add", "make_label"]);

        let err = registry.register(Shadowed).unwrap_err();
        assert!(matches!(err, RegistrationError::DuplicateParameter { ref name, .. } if name == "arg1"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_missing_handler() {
        let mut registry = ToolRegistry::new();
        let err = registry.register(Unbound).unwrap_err();
        assert!(matches!(err, RegistrationError::MissingHandler { ref method, .. } if method == "orphan"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_registries_are_isolated() {
        let first = calc_registry();
        let second = ToolRegistry::new();
        assert!(first.get("add").is_some());
        assert!(second.get("add").is_none());
        assert!(second.metadata().tool_methods(std::any::type_name::<Calc>()).is_empty());
    }

    #[test]
    fn test_validate_arguments() {
        let registry = calc_registry();

        let ok = registry.validate_arguments("add", &json!({"a": 1, "b": 2})).unwrap();
        assert!(ok.is_valid);
        assert_eq!(ok.data, Some(json!({"a": 1, "b": 2})));

        let bad = registry.validate_arguments("add", &json!({"a": "x"})).unwrap();
        assert!(!bad.is_valid);
        let paths: Vec<_> = bad.errors.unwrap().into_iter().map(|i| i.path).collect();
        assert_eq!(paths, vec!["a", "b"]);

        assert!(registry.validate_arguments("nope", &json!({})).is_err());
    }

    #[test]
    fn test_call_tool_blocking() {
        let registry = calc_registry();
        let err = tokio_test::block_on(registry.call_tool("add", json!({"a": "x", "b": 1}))).unwrap_err();
        assert_eq!(err.path(), Some("a"));
    }
}
