//! Tools domain module.
//!
//! This module handles all tool-related functionality for the MCP server.
//! Tools are executable functions that can be called by MCP clients to perform
//! specific actions.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `handlers.rs` - The `ToolHandler` trait every tool implements
//! - `registry.rs` - Registration, argument validation and dispatch
//! - `router.rs` - The server's tool set and the rmcp ToolRouter built from it
//! - `diagnostics.rs` - Fault-tolerant process diagnostics collector
//! - `response.rs` - Success and structured error envelopes
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` (e.g., `my_tool.rs`)
//! 2. Define a params struct and implement `ToolHandler`
//! 3. Export in `definitions/mod.rs`
//! 4. Register it in `router.rs`
//!
//! **No need to modify `server.rs`!**

pub mod definitions;
pub mod diagnostics;
mod error;
mod handlers;
mod registry;
pub mod response;
pub mod router;

pub use diagnostics::{DiagnosticsSnapshot, collect_diagnostics};
pub use error::ToolError;
pub use handlers::ToolHandler;
pub use registry::ToolRegistry;
pub use response::{ErrorPayload, ToolFault};
pub use router::{build_tool_registry, build_tool_router};
