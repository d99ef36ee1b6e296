// Security module for path validation and access control
//
// This module ensures that tool inputs are restricted to an optional
// configured root directory, preventing path traversal outside it.

pub mod path_validator;

pub use path_validator::{io_error_code, validate_path, PathSecurityError};
