pub mod read_file;
pub mod read_file_diagnostics;

pub use read_file::{ReadFileParams, ReadFileTool};
pub use read_file_diagnostics::ReadFileDiagnosticsTool;
