//! MCP Tool Toolkit
//!
//! This crate turns the methods of ordinary Rust services into MCP tools.
//! Each tool advertises a JSON Schema derived from its parameter validators
//! and every call is validated against those validators before the
//! handler runs.
//!
//! # Architecture
//!
//! - **core**: Configuration, error handling, the server facade and transports
//! - **domains**: Business logic organized by bounded contexts
//!   - **tools**: Validators, schema translation, metadata, registry and dispatch
//!
//! # Example
//!
//! ```rust,no_run
//! use mcp_toolkit::core::{Config, McpServer, TransportService};
//! use mcp_toolkit::domains::tools::{Arguments, ServiceTools, ToolService, Validator};
//!
//! struct Echo;
//!
//! impl ToolService for Echo {
//!     fn define_tools(tools: &mut ServiceTools<'_, Self>) {
//!         tools
//!             .method("echo")
//!             .tool("Echo a message")
//!             .param(0, "message", Validator::string())
//!             .sync_handler(|_: &Echo, args: Arguments| args.get::<String>(0));
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let transport = TransportService::new(config.transport.clone());
//!     let mut server = McpServer::new(config);
//!     server.register(Echo)?;
//!     transport.run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
pub use domains::tools::{ToolError, ToolRegistry, ToolService, Validator};
