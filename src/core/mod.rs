//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the MCP server,
//! including error handling, configuration, the startup context, server
//! lifecycle management and the stdio transport.

pub mod config;
pub mod context;
pub mod error;
pub mod security;
pub mod server;
pub mod transport;

pub use config::Config;
pub use context::ServerContext;
pub use error::{Error, Result};
pub use security::{validate_path, PathSecurityError};
pub use server::McpServer;
pub use transport::{StdioTransport, TransportError};
