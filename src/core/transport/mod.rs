//! Transport layer for the MCP server.
//!
//! This module provides different transport implementations:
//! - **STDIO**: Standard input/output (default for MCP) - feature: `stdio`
//! - **TCP**: One TCP client with JSON-RPC messages - feature: `tcp`
//!
//! Both speak newline-delimited JSON-RPC through the shared connection loop
//! and delegate message processing to an [`McpSession`].
//!
//! # Feature Flags
//!
//! - `stdio` (default): STDIO transport - minimal dependencies
//! - `tcp`: TCP transport - adds tokio/net

mod codec;
mod config;
mod connection;
mod error;
mod service;
mod session;

#[cfg(feature = "tcp")]
pub mod tcp;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use codec::{Frame, FrameCodec, MAX_LINE_BYTES};
pub use config::TransportConfig;
pub use connection::serve_connection;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;
pub use session::McpSession;

#[cfg(feature = "tcp")]
pub use config::TcpConfig;
