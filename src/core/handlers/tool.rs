//! Tool handlers.
//!
//! A tool handler receives the call's JSON arguments and produces a
//! [`ContentEnvelope`]. Most tools are written as plain async closures over
//! a typed argument struct and wrapped with [`FnToolHandler`], which takes
//! care of deserializing the arguments.

use std::future::Future;
use std::marker::PhantomData;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::ToolError;
use crate::core::content::ContentEnvelope;
use crate::core::protocol::JsonObject;

/// Trait for implementing tool handlers.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Execute the tool with the given arguments.
    async fn call(&self, arguments: JsonObject) -> Result<ContentEnvelope, ToolError>;
}

/// Argument type for tools that take no arguments.
///
/// Unknown fields are rejected, so any non-empty argument object fails
/// validation.
#[derive(Debug, Clone, Copy, Default, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct NoArgs {}

/// Adapts an async function over typed arguments into a [`ToolHandler`].
pub struct FnToolHandler<A, F> {
    f: F,
    _args: PhantomData<fn() -> A>,
}

impl<A, F> FnToolHandler<A, F> {
    /// Wrap the given function.
    pub fn new(f: F) -> Self {
        Self {
            f,
            _args: PhantomData,
        }
    }
}

#[async_trait]
impl<A, F, Fut> ToolHandler for FnToolHandler<A, F>
where
    A: DeserializeOwned + Send + 'static,
    F: Fn(A) -> Fut + Send + Sync,
    Fut: Future<Output = Result<ContentEnvelope, ToolError>> + Send,
{
    async fn call(&self, arguments: JsonObject) -> Result<ContentEnvelope, ToolError> {
        let args: A = serde_json::from_value(serde_json::Value::Object(arguments))
            .map_err(|e| ToolError::invalid_arguments(e.to_string()))?;
        (self.f)(args).await
    }
}
