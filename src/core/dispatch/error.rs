//! Dispatch error types.
//!
//! Every variant is recoverable: the transport turns it into a JSON-RPC error
//! response and keeps serving. Only a failure of the channel itself is fatal,
//! and that is a [`TransportError`](crate::core::transport::TransportError).

use std::fmt;
use std::time::Duration;

use serde_json::json;
use thiserror::Error;

use crate::core::protocol::{JsonRpcError, error_codes};

/// Boxed cause of a handler failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Machine-readable error category, sent to callers as `error.data.kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnknownTool,
    UnknownResource,
    InvalidArguments,
    HandlerFailure,
    MethodNotFound,
    TransportDecodeError,
    TransportEncodeError,
    DuplicateRegistration,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnknownTool => "UnknownTool",
            Self::UnknownResource => "UnknownResource",
            Self::InvalidArguments => "InvalidArguments",
            Self::HandlerFailure => "HandlerFailure",
            Self::MethodNotFound => "MethodNotFound",
            Self::TransportDecodeError => "TransportDecodeError",
            Self::TransportEncodeError => "TransportEncodeError",
            Self::DuplicateRegistration => "DuplicateRegistration",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced while decoding, dispatching or encoding a request.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No tool is registered under this name.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// No resource is registered under this URI.
    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    /// The arguments do not match the tool's input schema.
    #[error("Invalid arguments for tool '{tool}': {reason}")]
    InvalidArguments { tool: String, reason: String },

    /// The handler returned an error, panicked or timed out.
    #[error("Handler for '{target}' failed: {source}")]
    HandlerFailure {
        target: String,
        #[source]
        source: BoxError,
    },

    /// The JSON-RPC method is not served.
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// The inbound frame is not valid JSON.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The inbound message is not a valid JSON-RPC request.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The request parameters are malformed.
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// The result cannot be represented on the wire.
    #[error("Cannot encode result: {0}")]
    Encode(String),
}

impl DispatchError {
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool(name.into())
    }

    pub fn unknown_resource(uri: impl Into<String>) -> Self {
        Self::UnknownResource(uri.into())
    }

    pub fn invalid_arguments(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            tool: tool.into(),
            reason: reason.into(),
        }
    }

    pub fn handler_failure(target: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::HandlerFailure {
            target: target.into(),
            source: source.into(),
        }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self::InvalidParams(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Error category reported to the caller.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownTool(_) => ErrorKind::UnknownTool,
            Self::UnknownResource(_) => ErrorKind::UnknownResource,
            Self::InvalidArguments { .. } => ErrorKind::InvalidArguments,
            Self::HandlerFailure { .. } => ErrorKind::HandlerFailure,
            Self::MethodNotFound(_) => ErrorKind::MethodNotFound,
            Self::Parse(_) | Self::InvalidRequest(_) | Self::InvalidParams(_) => {
                ErrorKind::TransportDecodeError
            }
            Self::Encode(_) => ErrorKind::TransportEncodeError,
        }
    }

    /// JSON-RPC error code.
    pub fn code(&self) -> i32 {
        match self {
            Self::Parse(_) => error_codes::PARSE_ERROR,
            Self::InvalidRequest(_) => error_codes::INVALID_REQUEST,
            Self::MethodNotFound(_) => error_codes::METHOD_NOT_FOUND,
            Self::UnknownTool(_) | Self::InvalidArguments { .. } | Self::InvalidParams(_) => {
                error_codes::INVALID_PARAMS
            }
            Self::UnknownResource(_) => error_codes::RESOURCE_NOT_FOUND,
            Self::HandlerFailure { .. } | Self::Encode(_) => error_codes::INTERNAL_ERROR,
        }
    }

    /// Structured wire form: `{code, message, data: {kind}}`.
    pub fn to_rpc_error(&self) -> JsonRpcError {
        JsonRpcError {
            code: self.code(),
            message: self.to_string(),
            data: Some(json!({ "kind": self.kind().as_str() })),
        }
    }
}

/// Why a handler did not produce a result.
#[derive(Debug, Error)]
pub enum HandlerAbort {
    /// The handler panicked.
    #[error("handler panicked: {0}")]
    Panicked(String),

    /// The handler exceeded the configured time limit.
    #[error("handler timed out after {0:?}")]
    TimedOut(Duration),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_and_codes() {
        let cases = [
            (DispatchError::unknown_tool("x"), ErrorKind::UnknownTool, -32602),
            (DispatchError::unknown_resource("x"), ErrorKind::UnknownResource, -32002),
            (DispatchError::invalid_arguments("x", "bad"), ErrorKind::InvalidArguments, -32602),
            (DispatchError::MethodNotFound("x".into()), ErrorKind::MethodNotFound, -32601),
            (DispatchError::parse("x"), ErrorKind::TransportDecodeError, -32700),
            (DispatchError::invalid_request("x"), ErrorKind::TransportDecodeError, -32600),
            (DispatchError::invalid_params("x"), ErrorKind::TransportDecodeError, -32602),
            (DispatchError::encode("x"), ErrorKind::TransportEncodeError, -32603),
        ];

        for (err, kind, code) in cases {
            assert_eq!(err.kind(), kind, "{err}");
            assert_eq!(err.code(), code, "{err}");
        }
    }

    #[test]
    fn test_handler_failure_keeps_cause() {
        let err = DispatchError::handler_failure("get-time", HandlerAbort::Panicked("boom".into()));
        assert_eq!(err.kind(), ErrorKind::HandlerFailure);
        assert_eq!(err.code(), -32603);
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.to_string(), "Handler for 'get-time' failed: handler panicked: boom");
    }

    #[test]
    fn test_rpc_error_carries_kind() {
        let rpc = DispatchError::unknown_tool("nope").to_rpc_error();
        assert_eq!(rpc.message, "Unknown tool: nope");
        assert_eq!(rpc.data, Some(json!({ "kind": "UnknownTool" })));
    }
}
