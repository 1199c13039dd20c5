//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the MCP server:
//! the content model, the handler traits, the registry and dispatcher, the wire protocol types,
//! configuration, error handling and the transport layer.

pub mod config;
pub mod content;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod transport;

pub use config::Config;
pub use content::{CallToolResult, Content, ContentEnvelope, EmbeddedResource};
pub use dispatch::{DispatchError, Dispatcher, ErrorKind};
pub use error::{Error, Result};
pub use registry::{Registry, RegistryError, ResourceDescriptor, ToolDescriptor};
pub use server::McpServer;
pub use transport::{McpSession, TransportConfig, TransportService};
