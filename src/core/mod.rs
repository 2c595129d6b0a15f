//! Core module containing shared infrastructure components.
//!
//! This module provides configuration, the crate-level error type, the
//! server facade with its lifecycle, and the transport layer.

pub mod config;
pub mod error;
pub mod server;
pub mod transport;

pub use config::Config;
pub use error::{Error, Result};
pub use server::{McpServer, ServerDetails, ServerStatus};
pub use transport::{TransportConfig, TransportService};
