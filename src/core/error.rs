//! Error types and handling for the tool server.
//!
//! This module defines a unified error type that can represent errors from
//! registration, dispatch and the transports.

use thiserror::Error;

use super::transport::TransportError;
use crate::domains::tools::{RegistrationError, ToolError};

/// A specialized Result type for tool server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the tool server.
#[derive(Debug, Error)]
pub enum Error {
    /// Error raised while dispatching a tool call.
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    /// Error raised while registering a service.
    #[error("Registration error: {0}")]
    Registration(#[from] RegistrationError),

    /// Error raised by a transport.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Internal server errors that should not occur under normal operation.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
