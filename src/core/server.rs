//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating tool calls to the tool router.
//!
//! ## Tool Architecture
//!
//! Tools are defined in `domains/tools/definitions/` with one file per tool.
//! Each tool implements the `ToolHandler` trait (name, description, typed
//! parameters and an async `execute()`), and is registered with the
//! `ToolRegistry` in `domains/tools/router.rs`.
//! **Adding a new tool does NOT require modifying this file!**

use rmcp::{ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler};
use std::sync::Arc;

use super::config::Config;
use super::context::ServerContext;
use crate::domains::tools::build_tool_router;

/// The main MCP server handler.
///
/// This struct implements the `ServerHandler` trait from rmcp and routes
/// `tools/list` and `tools/call` to the registered tools.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration and startup context.
    ///
    /// Fails if two tools are registered under the same name.
    pub fn new(config: Config, context: ServerContext) -> crate::core::Result<Self> {
        let config = Arc::new(config);
        let context = Arc::new(context);

        Ok(Self {
            tool_router: build_tool_router::<Self>(config.clone(), context)?,
            config,
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Names of all registered tools, sorted.
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .tool_router
            .list_all()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        names.sort();
        names
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Tools for reading files (optionally with working-directory diagnostics) and \
                 converting PNG/JPEG images in a directory to WebP. Note: convert_webp writes \
                 new .webp files next to the originals."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}
