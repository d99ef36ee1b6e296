//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables, `.env` files, or defaults.
//!
//! Startup parameters passed on the command line (credential and passthrough
//! parameters) live in [`ServerContext`](super::context::ServerContext), not here.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Security and path validation configuration.
    pub security: SecurityConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Configuration for security and path validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Optional root directory for path operations.
    /// If None, no path restrictions are enforced.
    pub root_path: Option<PathBuf>,

    /// Whether symlinks may be used as tool inputs.
    /// Symlinks resolving outside the root are rejected either way.
    pub allow_symlinks: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            root_path: None,
            allow_symlinks: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "webp-convert-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            security: SecurityConfig::default(),
        }
    }
}

impl SecurityConfig {
    /// Log the active path restrictions.
    pub fn log_posture(&self) {
        match &self.root_path {
            Some(root) => info!("Path security enabled: root directory set to {}", root.display()),
            None => warn!("MCP_ROOT_PATH not set - tools may access any path readable by the process"),
        }
        if !self.allow_symlinks {
            info!("Symlinked tool inputs are rejected");
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`, `MCP_ROOT_PATH`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(root_path) = std::env::var("MCP_ROOT_PATH") {
            config.security.root_path = Some(PathBuf::from(root_path));
        }

        if let Ok(allow_symlinks) = std::env::var("MCP_ALLOW_SYMLINKS") {
            config.security.allow_symlinks = parse_bool(&allow_symlinks).unwrap_or(true);
        }

        config
    }
}

/// Parse the usual spellings of a boolean environment value.
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.name, "webp-convert-mcp");
        assert_eq!(config.logging.level, "info");
        assert!(config.security.root_path.is_none());
        assert!(config.security.allow_symlinks);
    }

    #[test]
    fn test_root_path_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_ROOT_PATH", "/srv/images");
            std::env::set_var("MCP_ALLOW_SYMLINKS", "false");
        }
        let config = Config::from_env();
        assert_eq!(
            config.security.root_path.as_deref(),
            Some(std::path::Path::new("/srv/images"))
        );
        assert!(!config.security.allow_symlinks);
        unsafe {
            std::env::remove_var("MCP_ROOT_PATH");
            std::env::remove_var("MCP_ALLOW_SYMLINKS");
        }
    }

    #[test]
    fn test_server_name_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_SERVER_NAME", "custom-name");
        }
        let config = Config::from_env();
        assert_eq!(config.server.name, "custom-name");
        unsafe {
            std::env::remove_var("MCP_SERVER_NAME");
        }
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn capture_logs(f: impl FnOnce()) -> String {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = logs.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_posture_warns_without_root() {
        let logs = capture_logs(|| SecurityConfig::default().log_posture());
        assert!(logs.contains("WARN"));
        assert!(logs.contains("MCP_ROOT_PATH not set"));
    }

    #[test]
    fn test_posture_reports_root() {
        let security = SecurityConfig {
            root_path: Some(PathBuf::from("/srv/images")),
            allow_symlinks: false,
        };
        let logs = capture_logs(|| security.log_posture());
        assert!(logs.contains("root directory set to /srv/images"));
        assert!(logs.contains("Symlinked tool inputs are rejected"));
        assert!(!logs.contains("WARN"));
    }

    #[test]
    fn test_from_env_does_not_log() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        let logs = capture_logs(|| {
            Config::from_env();
        });
        assert!(logs.is_empty());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" 0 "), Some(false));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
