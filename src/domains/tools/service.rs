//! Service definition API.
//!
//! A service is any type whose methods are exported as tools. Instead of
//! annotating methods in place, the service describes them once in
//! [`ToolService::define_tools`]:
//!
//! ```rust
//! use mcp_toolkit::domains::tools::{Arguments, ServiceTools, ToolService, Validator};
//!
//! struct Calculator;
//!
//! impl ToolService for Calculator {
//!     fn define_tools(tools: &mut ServiceTools<'_, Self>) {
//!         tools
//!             .method("add")
//!             .tool("Add two numbers")
//!             .param(0, "a", Validator::number())
//!             .param(1, "b", Validator::number())
//!             .sync_handler(|_calc: &Calculator, args: Arguments| {
//!                 Ok::<_, anyhow::Error>(args.get::<f64>(0)? + args.get::<f64>(1)?)
//!             });
//!     }
//! }
//! ```

use std::future::Future;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;

use super::handlers::{Arguments, MethodFn, erase_async, erase_sync};
use super::metadata::{DeclaredType, MetadataStore, MethodKey, ParamAnnotation, ToolAnnotation};
use super::validator::Validator;

/// A type whose methods are exported as tools.
pub trait ToolService: Send + Sync + 'static {
    /// Describe the tool methods of this service.
    fn define_tools(tools: &mut ServiceTools<'_, Self>)
    where
        Self: Sized;
}

/// Collects the metadata and handlers of one service during registration.
pub struct ServiceTools<'a, S> {
    service: String,
    store: &'a mut MetadataStore,
    handlers: IndexMap<String, MethodFn<S>>,
}

impl<'a, S> ServiceTools<'a, S>
where
    S: Send + Sync + 'static,
{
    pub(crate) fn new(store: &'a mut MetadataStore) -> Self {
        Self {
            service: std::any::type_name::<S>().to_string(),
            store,
            handlers: IndexMap::new(),
        }
    }

    /// Start describing `method`.
    pub fn method(&mut self, method: impl Into<String>) -> MethodBuilder<'_, 'a, S> {
        MethodBuilder {
            key: MethodKey::new(self.service.clone(), method),
            tools: self,
        }
    }

    /// Type name of the service being described.
    pub fn service(&self) -> &str {
        &self.service
    }

    pub(crate) fn into_handlers(self) -> (String, IndexMap<String, MethodFn<S>>) {
        (self.service, self.handlers)
    }
}

/// Describes one method of a service.
pub struct MethodBuilder<'t, 'a, S> {
    tools: &'t mut ServiceTools<'a, S>,
    key: MethodKey,
}

impl<S> MethodBuilder<'_, '_, S>
where
    S: Send + Sync + 'static,
{
    /// Export the method as a tool named after the method.
    pub fn tool(self, description: impl Into<String>) -> Self {
        self.annotate(None, description.into())
    }

    /// Export the method as a tool under an explicit name.
    pub fn tool_named(self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.annotate(Some(name.into()), description.into())
    }

    fn annotate(self, name: Option<String>, description: String) -> Self {
        self.tools
            .store
            .describe_tool(self.key.clone(), ToolAnnotation { name, description });
        self
    }

    /// Attach a validator to parameter `index`.
    pub fn param(self, index: usize, name: impl Into<String>, validator: Validator) -> Self {
        self.param_annotation(
            index,
            ParamAnnotation {
                name: Some(name.into()),
                validator: Some(validator),
                description: None,
            },
        )
    }

    /// Attach a validator and a description to parameter `index`.
    pub fn param_described(
        self,
        index: usize,
        name: impl Into<String>,
        validator: Validator,
        description: impl Into<String>,
    ) -> Self {
        self.param_annotation(
            index,
            ParamAnnotation {
                name: Some(name.into()),
                validator: Some(validator),
                description: Some(description.into()),
            },
        )
    }

    /// Attach a raw parameter annotation.
    pub fn param_annotation(self, index: usize, annotation: ParamAnnotation) -> Self {
        self.tools
            .store
            .describe_param(self.key.clone(), index, annotation);
        self
    }

    /// Declare parameter names and types for positions without validators.
    pub fn signature<N, T>(self, names: N, types: T) -> Self
    where
        N: IntoIterator,
        N::Item: Into<String>,
        T: IntoIterator<Item = DeclaredType>,
    {
        self.tools.store.declare_signature(
            self.key.clone(),
            names.into_iter().map(Into::into).collect(),
            types.into_iter().collect(),
        );
        self
    }

    /// Bind an async handler.
    pub fn handler<F, Fut, R, E>(self, f: F)
    where
        F: Fn(Arc<S>, Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, E>> + Send + 'static,
        R: Serialize + Send + 'static,
        E: Into<anyhow::Error> + Send + 'static,
    {
        self.tools
            .handlers
            .insert(self.key.method.clone(), erase_async(f));
    }

    /// Bind a synchronous handler.
    pub fn sync_handler<F, R, E>(self, f: F)
    where
        F: Fn(&S, Arguments) -> Result<R, E> + Send + Sync + 'static,
        R: Serialize + Send + 'static,
        E: Into<anyhow::Error> + Send + 'static,
    {
        self.tools
            .handlers
            .insert(self.key.method.clone(), erase_sync(f));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Greeter;

    impl ToolService for Greeter {
        fn define_tools(tools: &mut ServiceTools<'_, Self>) {
            tools
                .method("greet")
                .tool("Say hello")
                .param(0, "name", Validator::string())
                .sync_handler(|_: &Greeter, args: Arguments| {
                    Ok::<_, anyhow::Error>(format!("Hello, {}!", args.get::<String>(0)?))
                });
            tools
                .method("helper")
                .sync_handler(|_: &Greeter, _args: Arguments| Ok::<_, anyhow::Error>(()));
        }
    }

    #[test]
    fn test_define_tools_records_metadata_and_handlers() {
        let mut store = MetadataStore::new();
        let mut tools = ServiceTools::<Greeter>::new(&mut store);
        Greeter::define_tools(&mut tools);
        let (service, handlers) = tools.into_handlers();

        assert!(service.ends_with("Greeter"));
        assert_eq!(handlers.len(), 2);

        let methods: Vec<_> = store
            .tool_methods(&service)
            .iter()
            .map(|k| k.method.clone())
            .collect();
        assert_eq!(methods, vec!["greet"]);

        let key = MethodKey::new(service, "greet");
        assert_eq!(store.tool(&key).unwrap().description, "Say hello");
        assert_eq!(store.extract_parameters(&key, None).required(), vec!["name"]);
    }
}
