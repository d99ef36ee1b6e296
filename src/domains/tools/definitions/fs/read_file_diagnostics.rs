//! Read file tool with diagnostics.
//!
//! Same input as `read-file`, but the content is wrapped in a JSON envelope
//! together with a diagnostics snapshot, and faults come back as a
//! structured error payload instead of a protocol error.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

use super::read_file::{ReadFileParams, read_text_file};
use crate::core::config::Config;
use crate::core::context::ServerContext;
use crate::domains::tools::diagnostics::{DiagnosticsSnapshot, collect_diagnostics};
use crate::domains::tools::handlers::ToolHandler;
use crate::domains::tools::response::{error_result, json_success};

/// Success payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReadFileReport {
    diagnostics: DiagnosticsSnapshot,
    file_path: String,
    byte_size: usize,
    content: String,
    message: String,
}

/// Read file tool that reports working-directory diagnostics.
pub struct ReadFileDiagnosticsTool {
    config: Arc<Config>,
    context: Arc<ServerContext>,
}

impl ReadFileDiagnosticsTool {
    pub fn new(config: Arc<Config>, context: Arc<ServerContext>) -> Self {
        Self { config, context }
    }
}

#[async_trait::async_trait]
impl ToolHandler for ReadFileDiagnosticsTool {
    const NAME: &'static str = "read-file-diagnostics";

    const DESCRIPTION: &'static str = "Read the contents of a text file and return them as JSON \
        together with diagnostics about the server's working directory. Errors are reported as a \
        JSON error payload including the same diagnostics.";

    type Params = ReadFileParams;

    #[instrument(skip_all, fields(path = %params.path))]
    async fn execute(&self, params: ReadFileParams) -> Result<CallToolResult, McpError> {
        info!("Read file (diagnostics) tool called");

        let (path, content) = match read_text_file(&params.path, &self.config.security).await {
            Ok(read) => read,
            Err(fault) => return error_result(fault, &self.context).await,
        };

        let report = ReadFileReport {
            diagnostics: collect_diagnostics(&self.context).await,
            file_path: path.display().to_string(),
            byte_size: content.len(),
            message: format!("Read {} bytes from {}", content.len(), path.display()),
            content,
        };
        json_success(&report)
    }
}
