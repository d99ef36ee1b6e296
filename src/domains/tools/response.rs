//! Response envelopes shared by the tools.
//!
//! Success responses carry a single pretty-printed JSON text block. Faults
//! are reported as an `{"error": {...}}` payload with a fresh diagnostics
//! snapshot, inside a `CallToolResult` flagged as an error, rather than as a
//! protocol-level error.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;
use std::io;
use std::path::Path;
use tracing::warn;

use super::diagnostics::{DiagnosticsSnapshot, collect_diagnostics};
use crate::core::context::ServerContext;
use crate::core::security::{PathSecurityError, io_error_code};

/// Description of an operation fault: message plus optional code and path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolFault {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ToolFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            path: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_path(mut self, path: &Path) -> Self {
        self.path = Some(path.display().to_string());
        self
    }

    /// Build a fault from an I/O error on `path`.
    pub fn from_io(error: &io::Error, path: &Path) -> Self {
        Self::new(format!("{}: {}", error, path.display()))
            .with_code(io_error_code(error))
            .with_path(path)
    }
}

impl From<PathSecurityError> for ToolFault {
    fn from(error: PathSecurityError) -> Self {
        Self::new(error.to_string())
            .with_code(error.code())
            .with_path(error.path())
    }
}

/// Structured error payload returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    #[serde(flatten)]
    pub fault: ToolFault,
    pub diagnostics: DiagnosticsSnapshot,
}

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    error: &'a ErrorPayload,
}

/// Serialize `value` as pretty JSON into a successful single-text-block result.
pub fn json_success<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let text = to_pretty_json(value)?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

/// Report `fault` as a structured error payload with fresh diagnostics.
pub async fn error_result(
    fault: ToolFault,
    context: &ServerContext,
) -> Result<CallToolResult, McpError> {
    warn!(code = ?fault.code, path = ?fault.path, "{}", fault.message);

    let payload = ErrorPayload {
        fault,
        diagnostics: collect_diagnostics(context).await,
    };
    let text = to_pretty_json(&ErrorEnvelope { error: &payload })?;
    Ok(CallToolResult::error(vec![Content::text(text)]))
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, McpError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Failed to serialize response: {}", e), None))
}

/// Text of the first content block of a result.
#[cfg(test)]
pub(crate) fn result_text(result: &CallToolResult) -> &str {
    match &result.content[0].raw {
        rmcp::model::RawContent::Text(text) => &text.text,
        _ => panic!("Expected text content"),
    }
}
