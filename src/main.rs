//! MCP Server Entry Point
//!
//! Loads configuration, builds the startup context from the process
//! arguments, initializes logging and serves the tools over stdio.

use anyhow::{Context, Result};
use tracing::{Level, error, info};
use tracing_subscriber::{EnvFilter, fmt};

use webp_convert_mcp::core::{Config, McpServer, ServerContext, StdioTransport};

#[tokio::main]
async fn main() {
    // Load configuration from environment
    let config = Config::from_env();

    // Initialize logging
    init_logging(&config.logging.level);
    config.security.log_posture();

    let context = ServerContext::from_process();

    info!("Starting {} v{}", config.server.name, config.server.version);
    info!("Startup context: {:?}", context);

    if let Err(e) = run(config, context).await {
        error!("Fatal error running server: {:#}", e);
        std::process::exit(1);
    }

    info!("Server shutting down");
}

async fn run(config: Config, context: ServerContext) -> Result<()> {
    let server = McpServer::new(config, context).context("Failed to build server")?;

    info!("Server initialized with tools: {}", server.tool_names().join(", "));

    StdioTransport::run(server)
        .await
        .context("STDIO transport failed")?;
    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs go to stderr: stdout carries the MCP protocol.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();
}
