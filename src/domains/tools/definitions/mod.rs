//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file for better maintainability.

pub mod fs;
pub mod images;

pub use fs::{ReadFileDiagnosticsTool, ReadFileParams, ReadFileTool};
pub use images::{ConvertWebpParams, ConvertWebpTool};
