//! Tool and resource dispatcher.
//!
//! Turns a `(name, arguments)` pair into a [`ContentEnvelope`] or a typed
//! [`DispatchError`]. Handler failures are contained here: an error, a panic
//! or an expired time limit inside one handler becomes a `HandlerFailure`
//! for that request only.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tracing::{debug, instrument, warn};

use super::error::{DispatchError, HandlerAbort};
use super::schema::validate_arguments;
use crate::core::content::ContentEnvelope;
use crate::core::protocol::{JsonObject, ReadResourceResult, ResourceContents, ResourceInfo, ToolInfo};
use crate::core::registry::Registry;
use crate::core::handlers::ToolError;

/// Runtime options for handler execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOptions {
    /// Upper bound on a single handler invocation. `None` means no limit.
    pub handler_timeout: Option<Duration>,
}

/// Routes calls to registered handlers.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
    options: DispatchOptions,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self::with_options(registry, DispatchOptions::default())
    }

    pub fn with_options(registry: Arc<Registry>, options: DispatchOptions) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Invoke a tool.
    ///
    /// Missing arguments are treated as an empty object.
    #[instrument(skip(self, arguments))]
    pub async fn invoke(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<ContentEnvelope, DispatchError> {
        let tool = self
            .registry
            .lookup_tool(name)
            .ok_or_else(|| DispatchError::unknown_tool(name))?;

        let arguments = arguments.unwrap_or_default();
        validate_arguments(tool.input_schema(), &arguments)
            .map_err(|reason| DispatchError::invalid_arguments(name, reason))?;

        debug!("Calling tool: {}", name);
        let handler = Arc::clone(tool.handler());
        match self.guarded(handler.call(arguments)).await {
            Ok(Ok(envelope)) => Ok(envelope),
            Ok(Err(ToolError::InvalidArguments(reason))) => {
                Err(DispatchError::invalid_arguments(name, reason))
            }
            Ok(Err(e)) => {
                warn!("Tool '{}' failed: {}", name, e);
                Err(DispatchError::handler_failure(name, e))
            }
            Err(abort) => {
                warn!("Tool '{}' aborted: {}", name, abort);
                Err(DispatchError::handler_failure(name, abort))
            }
        }
    }

    /// Read a resource by URI.
    #[instrument(skip(self))]
    pub async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult, DispatchError> {
        let resource = self
            .registry
            .lookup_resource(uri)
            .ok_or_else(|| DispatchError::unknown_resource(uri))?;

        debug!("Reading resource: {}", uri);
        let handler = Arc::clone(resource.handler());
        let text = match self.guarded(handler.read()).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                warn!("Resource '{}' failed: {}", uri, e);
                return Err(DispatchError::handler_failure(uri, e));
            }
            Err(abort) => {
                warn!("Resource '{}' aborted: {}", uri, abort);
                return Err(DispatchError::handler_failure(uri, abort));
            }
        };

        Ok(ReadResourceResult {
            contents: vec![ResourceContents {
                uri: resource.uri().to_string(),
                mime_type: resource.mime_type().to_string(),
                text,
            }],
        })
    }

    /// All registered tools, ordered by name.
    pub fn list_tools(&self) -> Vec<ToolInfo> {
        self.registry.tools().map(|t| t.info()).collect()
    }

    /// All registered resources, ordered by URI.
    pub fn list_resources(&self) -> Vec<ResourceInfo> {
        self.registry.resources().map(|r| r.info()).collect()
    }

    /// Run a handler future, catching panics and enforcing the time limit.
    async fn guarded<T>(&self, fut: impl Future<Output = T>) -> Result<T, HandlerAbort> {
        let caught = AssertUnwindSafe(fut).catch_unwind();

        let outcome = match self.options.handler_timeout {
            Some(limit) => tokio::time::timeout(limit, caught)
                .await
                .map_err(|_| HandlerAbort::TimedOut(limit))?,
            None => caught.await,
        };

        outcome.map_err(|payload| HandlerAbort::Panicked(panic_message(payload.as_ref())))
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
