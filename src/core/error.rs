//! Error types and handling for the MCP server.
//!
//! This module defines the error type returned while building the server.

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Error originating from the tools domain (e.g. duplicate registration).
    #[error("Tool error: {0}")]
    Tool(#[from] crate::domains::tools::ToolError),
}
