//! Handler serving a bundled resource definition.

use std::marker::PhantomData;

use async_trait::async_trait;

use super::definitions::ResourceDefinition;
use crate::core::handlers::{ResourceError, ResourceHandler};

/// Serves the content of a [`ResourceDefinition`].
pub struct DefinitionHandler<R>(PhantomData<fn() -> R>);

impl<R> DefinitionHandler<R> {
    /// Create a handler for the definition `R`.
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<R> Default for DefinitionHandler<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: ResourceDefinition> ResourceHandler for DefinitionHandler<R> {
    async fn read(&self) -> Result<String, ResourceError> {
        Ok(R::content())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    impl ResourceDefinition for Fixed {
        const URI: &'static str = "test://fixed";
        const NAME: &'static str = "fixed";
        const DESCRIPTION: &'static str = "fixed content";
        const MIME_TYPE: &'static str = "text/plain";

        fn content() -> String {
            "fixed".to_string()
        }
    }

    #[tokio::test]
    async fn test_definition_handler_reads_content() {
        let handler = DefinitionHandler::<Fixed>::new();
        assert_eq!(handler.read().await.unwrap(), "fixed");
    }
}
