//! MCP Apps Server Entry Point
//!
//! Initializes logging, loads configuration, and serves the configured
//! transport until the peer disconnects. A channel failure ends the process
//! with an error.

use anyhow::{Context, Result};
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use mcp_apps_server::core::config::LoggingConfig;
use mcp_apps_server::core::{Config, McpServer, TransportService};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging first so configuration warnings are visible
    let logging = LoggingConfig::from_env();
    init_logging(&logging.level, logging.with_timestamps);

    // Load configuration from environment
    let config = Config::from_env();

    info!("Starting {} v{}", config.server.name, config.server.version);

    let server = McpServer::new(config.clone()).context("failed to build the tool registry")?;

    info!("Server initialized");

    let transport = TransportService::new(config.transport);
    transport.run(server).await.context("transport failed")?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs go to stderr: stdout carries the protocol.
fn init_logging(level: &str, with_timestamps: bool) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);

    if with_timestamps {
        builder.init();
    } else {
        builder.without_time().init();
    }
}
