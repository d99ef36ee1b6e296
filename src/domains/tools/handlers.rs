//! The tool abstraction.
//!
//! Every tool is a struct implementing [`ToolHandler`]: a unique name, a
//! description shown to clients, a typed parameter struct whose JSON schema
//! is advertised in `tools/list`, and an async `execute()`.
//!
//! Tools are constructed once at startup with the shared `Config` and
//! `ServerContext` and live for the lifetime of the process.

use rmcp::{
    ErrorData as McpError,
    handler::server::tool::cached_schema_for_type,
    model::{CallToolResult, Tool, ToolAnnotations},
};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

/// Trait implemented by every tool exposed by the server.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync + 'static {
    /// Tool name as registered in MCP. Unique within a registry.
    const NAME: &'static str;

    /// Tool description shown to clients.
    const DESCRIPTION: &'static str;

    /// Whether the tool leaves the filesystem untouched.
    const READ_ONLY: bool = true;

    /// Typed arguments. Deserializing into this type is the schema validation
    /// step; the executor only ever sees validated input.
    type Params: DeserializeOwned + JsonSchema + Send + 'static;

    /// Run the tool.
    ///
    /// Operation faults should be reported inside the returned
    /// `CallToolResult`; an `Err` surfaces as a protocol-level error.
    async fn execute(&self, params: Self::Params) -> Result<CallToolResult, McpError>;

    /// Create a Tool model for this tool (metadata).
    fn to_tool() -> Tool
    where
        Self: Sized,
    {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<Self::Params>(),
            annotations: Some(ToolAnnotations {
                title: None,
                read_only_hint: Some(Self::READ_ONLY),
                destructive_hint: Some(!Self::READ_ONLY),
                idempotent_hint: Some(true),
                open_world_hint: Some(false),
            }),
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}
