//! Error types and handling for the MCP server.
//!
//! This module defines a unified error type for start-up and serving: a
//! rejected registration or a broken channel. Per-request failures are
//! [`DispatchError`](super::dispatch::DispatchError)s and never end the server.

use thiserror::Error;

use super::dispatch::ErrorKind;
use super::registry::RegistryError;
use super::transport::TransportError;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Duplicate registration in strict mode.
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// The transport channel failed.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

impl Error {
    /// Caller-facing category, when the error maps to one.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Registry(_) => Some(ErrorKind::DuplicateRegistration),
            Self::Transport(_) => None,
        }
    }
}
