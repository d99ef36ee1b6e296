//! Read file tool definition.
//!
//! Returns the content of a text file verbatim. Faults surface as
//! protocol-level errors; see `read_file_diagnostics` for the variant that
//! reports them as a structured payload.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::core::config::{Config, SecurityConfig};
use crate::core::context::ServerContext;
use crate::core::security::validate_path;
use crate::domains::tools::handlers::ToolHandler;
use crate::domains::tools::response::ToolFault;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters shared by the file reading tools.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ReadFileParams {
    /// Path to the file to read. Absolute, or relative to the server's working directory.
    #[serde(alias = "absoluteFilePath")]
    pub path: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Read file tool - returns the raw text content of a file.
pub struct ReadFileTool {
    config: Arc<Config>,
    context: Arc<ServerContext>,
}

impl ReadFileTool {
    pub fn new(config: Arc<Config>, context: Arc<ServerContext>) -> Self {
        Self { config, context }
    }
}

#[async_trait::async_trait]
impl ToolHandler for ReadFileTool {
    const NAME: &'static str = "read-file";

    const DESCRIPTION: &'static str =
        "Read the contents of a text file from an absolute or relative path and return it verbatim.";

    type Params = ReadFileParams;

    #[instrument(skip_all, fields(path = %params.path))]
    async fn execute(&self, params: ReadFileParams) -> Result<CallToolResult, McpError> {
        info!(
            credential_provided = self.context.api_key_provided(),
            "Read file tool called"
        );

        match read_text_file(&params.path, &self.config.security).await {
            Ok((path, content)) => {
                info!("Read {} bytes from {}", content.len(), path.display());
                Ok(CallToolResult::success(vec![Content::text(content)]))
            }
            Err(fault) => Err(McpError::internal_error(
                fault.message,
                Some(serde_json::json!({ "code": fault.code, "path": fault.path })),
            )),
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Validate `input` and read the file as UTF-8 text.
pub(crate) async fn read_text_file(
    input: &str,
    security: &SecurityConfig,
) -> Result<(PathBuf, String), ToolFault> {
    let path = validate_path(input, security)?;
    let content = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| ToolFault::from_io(&e, &path))?;
    Ok((path, content))
}

// ============================================================================
// Tests
// ============================================================================
