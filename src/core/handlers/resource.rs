//! Resource handlers.
//!
//! A resource handler produces the current text content of a resource. It
//! takes no arguments and is called again for every read, so dynamic
//! resources always return fresh content.

use std::future::Future;

use async_trait::async_trait;

use super::ResourceError;

/// Trait for implementing resource handlers.
#[async_trait]
pub trait ResourceHandler: Send + Sync {
    /// Read the current content of the resource.
    async fn read(&self) -> Result<String, ResourceError>;
}

/// Adapts an async function into a [`ResourceHandler`].
pub struct FnResourceHandler<F>(F);

impl<F> FnResourceHandler<F> {
    /// Wrap the given function.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F, Fut> ResourceHandler for FnResourceHandler<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<String, ResourceError>> + Send,
{
    async fn read(&self) -> Result<String, ResourceError> {
        (self.0)().await
    }
}
