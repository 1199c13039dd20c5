//! MCP Apps Server Library
//!
//! A Model Context Protocol (MCP) server exposing tools that answer with rich
//! content: a text summary plus an embedded HTML app, also readable as a
//! standalone resource.
//!
//! # Architecture
//!
//! - **core**: content model, registry, dispatcher, wire protocol,
//!   configuration, error handling and transports
//! - **domains**: business logic organized by bounded contexts
//!   - **tools**: MCP tools that can be executed by clients
//!   - **resources**: HTML apps that can be read by clients
//!   - **host**: clock and metrics capabilities injected into the tools
//!
//! # Example
//!
//! ```rust,no_run
//! use mcp_apps_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config.clone())?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
