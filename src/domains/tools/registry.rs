//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - Registration of `ToolHandler` implementations (duplicate names are rejected)
//! - Argument validation and dispatch by tool name
//! - Conversion into the rmcp `ToolRouter` used by the server handler
//!
//! The router and [`ToolRegistry::call`] share the same dispatch closure, so
//! a call through either path validates and executes identically.

use futures::{FutureExt, future::BoxFuture};
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter},
    model::{CallToolResult, JsonObject, Tool},
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::error::ToolError;
use super::handlers::ToolHandler;

type DispatchFuture = BoxFuture<'static, Result<CallToolResult, McpError>>;
type DispatchFn = Arc<dyn Fn(JsonObject) -> DispatchFuture + Send + Sync>;

struct RegisteredTool {
    tool: Tool,
    dispatch: DispatchFn,
}

/// Tool registry - manages all available tools.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, RegisteredTool>,
}

impl ToolRegistry {
    /// Create an empty tool registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool.
    ///
    /// Returns `ToolError::DuplicateTool` if a tool with the same name is
    /// already registered; the existing registration is kept.
    pub fn register<T: ToolHandler>(&mut self, handler: T) -> Result<(), ToolError> {
        if self.tools.contains_key(T::NAME) {
            warn!("Rejecting duplicate tool registration: {}", T::NAME);
            return Err(ToolError::duplicate(T::NAME));
        }

        let handler = Arc::new(handler);
        let dispatch: DispatchFn = Arc::new(move |arguments: JsonObject| {
            let handler = handler.clone();
            async move {
                let params: T::Params =
                    serde_json::from_value(serde_json::Value::Object(arguments)).map_err(|e| {
                        let err = ToolError::invalid_arguments(e.to_string());
                        warn!(tool = T::NAME, "{}", err);
                        McpError::invalid_params(err.to_string(), None)
                    })?;
                debug!(tool = T::NAME, "Arguments validated, executing");
                handler.execute(params).await
            }
            .boxed()
        });

        info!("Registered tool: {}", T::NAME);
        self.tools.insert(
            T::NAME.to_string(),
            RegisteredTool {
                tool: T::to_tool(),
                dispatch,
            },
        );
        Ok(())
    }

    /// Get all tool names, sorted.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// Get all tools as Tool models (metadata).
    pub fn tools(&self) -> Vec<Tool> {
        self.tools.values().map(|entry| entry.tool.clone()).collect()
    }

    /// Validate `arguments` against the named tool and execute it.
    ///
    /// Unknown tools and arguments that do not match the tool's parameters
    /// are protocol-level `invalid_params` errors; the executor does not run.
    pub async fn call(
        &self,
        name: &str,
        arguments: JsonObject,
    ) -> Result<CallToolResult, McpError> {
        let Some(entry) = self.tools.get(name) else {
            warn!("Unknown tool requested: {}", name);
            return Err(McpError::invalid_params(
                ToolError::not_found(name).to_string(),
                None,
            ));
        };
        (entry.dispatch)(arguments).await
    }

    /// Build the rmcp ToolRouter serving every registered tool.
    pub fn into_router<S>(self) -> ToolRouter<S>
    where
        S: Send + Sync + 'static,
    {
        self.tools
            .into_values()
            .fold(ToolRouter::new(), |router, entry| {
                let dispatch = entry.dispatch;
                router.with_route(ToolRoute::new_dyn(
                    entry.tool,
                    move |ctx: ToolCallContext<'_, S>| {
                        let arguments = ctx.arguments.clone().unwrap_or_default();
                        dispatch(arguments)
                    },
                ))
            })
    }
}
