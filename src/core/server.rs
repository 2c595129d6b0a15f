//! Tool server implementation and lifecycle management.
//!
//! [`McpServer`] owns the tool registry and implements the MCP protocol by
//! delegating to it. Services are registered while the server is still
//! exclusively owned; once a transport takes it (and clones it per
//! connection) the set of tools is fixed.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Content, Implementation, ListToolsResult,
        PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool,
    },
    service::RequestContext,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use tracing::{info, instrument};

use super::config::Config;
use super::error::{Error, Result};
use crate::domains::tools::{
    ToolDefinition, ToolError, ToolFailure, ToolRegistry, ToolResult, ToolService,
    ValidationResult,
};

/// Lifecycle state of a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    Stopped,
    Running,
    Error,
}

impl ServerStatus {
    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::Running,
            2 => Self::Error,
            _ => Self::Stopped,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            Self::Stopped => 0,
            Self::Running => 1,
            Self::Error => 2,
        }
    }
}

/// Snapshot of the server's identity and state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerDetails {
    pub name: String,
    pub version: String,
    pub protocol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    pub status: ServerStatus,
    pub tools: usize,
}

/// The main MCP server handler.
///
/// This struct implements the `ServerHandler` trait from rmcp; clones share
/// the registry and the lifecycle status.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Every registered tool.
    registry: Arc<ToolRegistry>,

    status: Arc<AtomicU8>,
}

impl McpServer {
    /// Create a new server with no tools.
    pub fn new(config: Config) -> Self {
        Self::with_registry(config, ToolRegistry::new())
    }

    /// Create a server around an already populated registry.
    pub fn with_registry(config: Config, registry: ToolRegistry) -> Self {
        Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
            status: Arc::new(AtomicU8::new(ServerStatus::Stopped.as_u8())),
        }
    }

    /// Register every tool method of `service`.
    ///
    /// Fails if the server has already been cloned, for instance by a
    /// running transport.
    pub fn register<S: ToolService>(&mut self, service: S) -> Result<usize> {
        self.register_arc(Arc::new(service))
    }

    /// Register a shared service instance.
    pub fn register_arc<S: ToolService>(&mut self, service: Arc<S>) -> Result<usize> {
        let registry = Arc::get_mut(&mut self.registry).ok_or_else(|| {
            Error::internal("services must be registered before the server is shared")
        })?;
        Ok(registry.register_arc(service)?)
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Get the tool registry.
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Current lifecycle status.
    pub fn status(&self) -> ServerStatus {
        ServerStatus::from_u8(self.status.load(Ordering::Acquire))
    }

    pub(crate) fn set_status(&self, status: ServerStatus) {
        self.status.store(status.as_u8(), Ordering::Release);
    }

    /// Identity, endpoint and state of the server.
    pub fn server_info(&self) -> ServerDetails {
        let transport = &self.config.transport;
        ServerDetails {
            name: self.config.server.name.clone(),
            version: self.config.server.version.clone(),
            protocol: transport.protocol().to_string(),
            host: transport.host().map(str::to_string),
            port: transport.port(),
            status: self.status(),
            tools: self.registry.len(),
        }
    }

    /// List all registered tools.
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        self.registry.list_tools()
    }

    /// Call a tool by name.
    #[instrument(skip(self, arguments))]
    pub async fn call_tool(&self, name: &str, arguments: Value) -> std::result::Result<ToolResult, ToolError> {
        info!("Calling tool: {}", name);
        self.registry.call_tool(name, arguments).await
    }

    /// Check arguments for a tool without running it.
    pub fn validate_arguments(&self, name: &str, arguments: &Value) -> std::result::Result<ValidationResult, ToolError> {
        self.registry.validate_arguments(name, arguments)
    }
}

/// Convert a tool definition to the rmcp model.
pub(crate) fn to_rmcp_tool(definition: ToolDefinition) -> Tool {
    Tool {
        name: definition.name.into(),
        description: definition.description.map(Into::into),
        input_schema: Arc::new(definition.input_schema.to_object()),
        annotations: None,
        output_schema: None,
        icons: None,
        meta: None,
        title: None,
    }
}

/// Convert a tool result to the rmcp model.
pub(crate) fn to_call_result(result: ToolResult) -> CallToolResult {
    let is_error = result.is_error();
    let content = result
        .content
        .into_iter()
        .map(|item| Content::text(item.text))
        .collect();
    if is_error {
        CallToolResult::error(content)
    } else {
        CallToolResult::success(content)
    }
}

/// Map a dispatch failure onto the protocol.
pub(crate) fn map_tool_error(error: ToolError) -> std::result::Result<CallToolResult, McpError> {
    match error.into_failure() {
        ToolFailure::InvalidParams { message, data } => {
            Err(McpError::invalid_params(message, Some(data)))
        }
        ToolFailure::Result(result) => Ok(to_call_result(result)),
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: self.config.server.instructions.clone(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.config.server.name.clone(),
                title: None,
                version: self.config.server.version.clone(),
                website_url: None,
                icons: None,
            },
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        info!("Listing tools");
        Ok(ListToolsResult {
            tools: self.list_tools().into_iter().map(to_rmcp_tool).collect(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, request, _context), fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let arguments = request.arguments.map(Value::Object).unwrap_or(Value::Null);
        match McpServer::call_tool(self, &request.name, arguments).await {
            Ok(result) => Ok(to_call_result(result)),
            Err(error) => map_tool_error(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::{Arguments, ServiceTools, Validator};
    use serde_json::json;

    struct Greeter;

    impl ToolService for Greeter {
        fn define_tools(tools: &mut ServiceTools<'_, Self>) {
            tools
                .method("greet")
                .tool("Say hello")
                .param(0, "name", Validator::string().min(1))
                .sync_handler(|_: &Greeter, args: Arguments| {
                    Ok::<_, anyhow::Error>(format!("Hello, {}!", args.get::<String>(0)?))
                });
            tools
                .method("fail")
                .tool("Always fails")
                .sync_handler(|_: &Greeter, _args: Arguments| {
                    Err::<(), _>(anyhow::anyhow!("nothing to see"))
                });
        }
    }

    fn server() -> McpServer {
        let mut server = McpServer::new(Config::named("greeter", "0.1.0"));
        assert_eq!(server.register(Greeter).unwrap(), 2);
        server
    }

    #[test]
    fn test_server_info_defaults() {
        let server = server();
        let info = server.server_info();
        assert_eq!(info.name, "greeter");
        assert_eq!(info.version, "0.1.0");
        assert_eq!(info.status, ServerStatus::Stopped);
        assert_eq!(info.tools, 2);

        server.set_status(ServerStatus::Running);
        assert_eq!(server.clone().server_info().status, ServerStatus::Running);
    }

    #[test]
    fn test_register_after_share_fails() {
        let mut server = server();
        let _shared = server.clone();
        assert!(matches!(server.register(Greeter), Err(Error::Internal(_))));
    }

    #[test]
    fn test_duplicate_registration_is_reported() {
        let mut server = server();
        assert!(matches!(server.register(Greeter), Err(Error::Registration(_))));
        assert_eq!(server.list_tools().len(), 2);
    }

    #[tokio::test]
    async fn test_call_tool() {
        let server = server();
        let result = server.call_tool("greet", json!({"name": "Ada"})).await.unwrap();
        assert_eq!(result, ToolResult::text("Hello, Ada!"));
    }

    #[test]
    fn test_rmcp_tool_conversion() {
        let server = server();
        let tool = to_rmcp_tool(server.list_tools().remove(0));
        assert_eq!(tool.name, "greet");
        assert_eq!(tool.input_schema.get("required"), Some(&json!(["name"])));
    }

    #[tokio::test]
    async fn test_error_mapping() {
        let server = server();

        let missing = server.call_tool("nope", json!({})).await.unwrap_err();
        assert!(map_tool_error(missing).is_err());

        let invalid = server.call_tool("greet", json!({"name": ""})).await.unwrap_err();
        let err = map_tool_error(invalid).unwrap_err();
        assert_eq!(err.data.unwrap()["path"], json!("name"));

        let failed = server.call_tool("fail", json!({})).await.unwrap_err();
        let result = map_tool_error(failed).unwrap();
        assert_eq!(result.is_error, Some(true));
    }
}
