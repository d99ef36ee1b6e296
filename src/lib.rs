//! WebP Convert MCP Server Library
//!
//! This crate provides a Model Context Protocol (MCP) server exposing a small
//! set of tools over stdio: reading files (optionally with working-directory
//! diagnostics) and converting PNG/JPEG images to WebP.
//!
//! # Architecture
//!
//! - **core**: configuration, startup context, error handling, the server
//!   handler and the stdio transport
//! - **domains**: business logic organized by bounded contexts
//!   - **tools**: the tool abstraction, registry and tool definitions
//!
//! # Example
//!
//! ```rust,no_run
//! use webp_convert_mcp::core::{Config, McpServer, ServerContext, StdioTransport};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let server = McpServer::new(Config::from_env(), ServerContext::from_process())?;
//!     StdioTransport::run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result, ServerContext};
