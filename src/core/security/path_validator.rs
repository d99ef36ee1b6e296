use std::io;
use std::path::{Path, PathBuf};

use crate::core::config::SecurityConfig;

/// Errors that can occur during path validation
#[derive(Debug, thiserror::Error)]
pub enum PathSecurityError {
    #[error("Path '{path}' is outside allowed root directory '{root}'")]
    OutsideRootDirectory { path: PathBuf, root: PathBuf },

    #[error("Symlinks are not allowed: '{path}'")]
    SymlinkNotAllowed { path: PathBuf },

    #[error("Path does not exist: '{path}'")]
    PathNotFound { path: PathBuf },

    #[error("IO error for path '{path}': {error}")]
    IoError { path: PathBuf, error: io::Error },
}

impl PathSecurityError {
    /// The path the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            Self::OutsideRootDirectory { path, .. }
            | Self::SymlinkNotAllowed { path }
            | Self::PathNotFound { path }
            | Self::IoError { path, .. } => path,
        }
    }

    /// Short machine-readable code, errno style where one applies.
    pub fn code(&self) -> String {
        match self {
            Self::OutsideRootDirectory { .. } => "EOUTSIDEROOT".to_string(),
            Self::SymlinkNotAllowed { .. } => "ESYMLINK".to_string(),
            Self::PathNotFound { .. } => "ENOENT".to_string(),
            Self::IoError { error, .. } => io_error_code(error),
        }
    }
}

/// Map an I/O error to an errno-style code (`ENOENT`, `EACCES`, ...).
///
/// Kinds without a conventional errno name fall back to the `ErrorKind` name.
pub fn io_error_code(error: &io::Error) -> String {
    match error.kind() {
        io::ErrorKind::NotFound => "ENOENT".to_string(),
        io::ErrorKind::PermissionDenied => "EACCES".to_string(),
        io::ErrorKind::AlreadyExists => "EEXIST".to_string(),
        io::ErrorKind::NotADirectory => "ENOTDIR".to_string(),
        io::ErrorKind::IsADirectory => "EISDIR".to_string(),
        io::ErrorKind::InvalidInput => "EINVAL".to_string(),
        kind => format!("{:?}", kind),
    }
}

/// Validates that a given path is within the configured security boundaries.
///
/// 1. Resolves relative paths against the working directory and requires the
///    path to exist
/// 2. Rejects symlinks when `allow_symlinks` is off
/// 3. If a root path is configured, ensures the canonical path is within that root
///
/// # Returns
///
/// * `Ok(PathBuf)` - The canonicalized, validated path
/// * `Err(PathSecurityError)` - If validation fails
///
/// # Examples
///
/// ```rust,ignore
/// let safe_path = validate_path("/home/user/images/logo.png", &config.security)?;
/// ```
pub fn validate_path(
    input_path: &str,
    security: &SecurityConfig,
) -> Result<PathBuf, PathSecurityError> {
    let path = Path::new(input_path);

    let metadata = path.symlink_metadata().map_err(|e| map_io(path, e))?;
    if metadata.file_type().is_symlink() && !security.allow_symlinks {
        return Err(PathSecurityError::SymlinkNotAllowed {
            path: path.to_path_buf(),
        });
    }

    let canonical_path = path.canonicalize().map_err(|e| map_io(path, e))?;

    let Some(ref root) = security.root_path else {
        return Ok(canonical_path);
    };

    let canonical_root = root.canonicalize().map_err(|e| PathSecurityError::IoError {
        path: root.clone(),
        error: e,
    })?;

    if !is_within_root(&canonical_path, &canonical_root) {
        return Err(PathSecurityError::OutsideRootDirectory {
            path: canonical_path,
            root: canonical_root,
        });
    }

    Ok(canonical_path)
}

/// Checks if a path is within (or equal to) a root directory
fn is_within_root(path: &Path, root: &Path) -> bool {
    path.starts_with(root)
}

fn map_io(path: &Path, error: io::Error) -> PathSecurityError {
    if error.kind() == io::ErrorKind::NotFound {
        PathSecurityError::PathNotFound {
            path: path.to_path_buf(),
        }
    } else {
        PathSecurityError::IoError {
            path: path.to_path_buf(),
            error,
        }
    }
}
