//! Transport service - orchestrates different transport types.
//!
//! This service provides a unified interface for starting the tool server
//! with different transport mechanisms, and records the server's lifecycle
//! status as the transport starts and ends.

use tracing::{error, info};

use super::{TransportConfig, TransportResult};
use crate::core::McpServer;
use crate::core::server::ServerStatus;

#[cfg(feature = "stdio")]
use super::stdio::StdioTransport;

#[cfg(feature = "tcp")]
use super::tcp::TcpTransport;

#[cfg(feature = "http")]
use super::http::HttpTransport;

/// Transport service - manages the transport layer for the tool server.
pub struct TransportService {
    config: TransportConfig,
}

impl TransportService {
    /// Create a new transport service with the given configuration.
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }

    /// Get the transport configuration.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Start the transport with the given server.
    ///
    /// This method blocks until the transport is shut down. The server is
    /// marked `running` once the transport is ready, then `stopped` or
    /// `error` depending on how it ended.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        info!("Starting transport: {}", self.config.description());

        let handle = server.clone();
        let result = match self.config {
            #[cfg(feature = "stdio")]
            TransportConfig::Stdio => StdioTransport::run(server).await,
            #[cfg(feature = "tcp")]
            TransportConfig::Tcp(cfg) => TcpTransport::new(cfg).run(server).await,
            #[cfg(feature = "http")]
            TransportConfig::Http(cfg) => HttpTransport::new(cfg).run(server).await,
        };

        match &result {
            Ok(()) => handle.set_status(ServerStatus::Stopped),
            Err(e) => {
                error!("Transport failed: {}", e);
                handle.set_status(ServerStatus::Error);
            }
        }
        result
    }
}
