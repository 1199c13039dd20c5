//! Tool and resource registry.
//!
//! Two independent name spaces: tools keyed by name and resources keyed by
//! URI. A tool and a resource may share an identifier without conflict.
//!
//! The registry is filled once at start-up and then shared read-only behind
//! an `Arc`, so lookups need no locking.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use super::content::ContentEnvelope;
use super::handlers::{FnToolHandler, ResourceHandler, ToolError, ToolHandler};
use super::protocol::{JsonObject, ResourceInfo, ToolInfo};

/// Errors raised by strict registration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A tool with this name is already registered.
    #[error("Tool already registered: {0}")]
    DuplicateTool(String),

    /// A resource with this URI is already registered.
    #[error("Resource already registered: {0}")]
    DuplicateResource(String),
}

// ============================================================================
// Descriptors
// ============================================================================

/// A registered tool.
#[derive(Clone)]
pub struct ToolDescriptor {
    name: String,
    description: String,
    input_schema: JsonObject,
    handler: Arc<dyn ToolHandler>,
}

impl ToolDescriptor {
    /// Create a descriptor from its parts.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: JsonObject,
        handler: Arc<dyn ToolHandler>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
            handler,
        }
    }

    /// Create a descriptor from an async function over typed arguments.
    ///
    /// The input schema is generated from `A`, so the advertised schema and
    /// the argument decoding always agree.
    pub fn from_fn<A, F, Fut>(name: impl Into<String>, description: impl Into<String>, f: F) -> Self
    where
        A: DeserializeOwned + JsonSchema + Send + 'static,
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ContentEnvelope, ToolError>> + Send + 'static,
    {
        Self::new(
            name,
            description,
            schema_object_for::<A>(),
            Arc::new(FnToolHandler::new(f)),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn input_schema(&self) -> &JsonObject {
        &self.input_schema
    }

    pub fn handler(&self) -> &Arc<dyn ToolHandler> {
        &self.handler
    }

    /// Listing entry for `tools/list`.
    pub fn info(&self) -> ToolInfo {
        ToolInfo {
            name: self.name.clone(),
            description: self.description.clone(),
            input_schema: self.input_schema.clone(),
        }
    }
}

impl std::fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .finish_non_exhaustive()
    }
}

/// A registered resource.
#[derive(Clone)]
pub struct ResourceDescriptor {
    uri: String,
    name: String,
    description: Option<String>,
    mime_type: String,
    handler: Arc<dyn ResourceHandler>,
}

impl ResourceDescriptor {
    /// Create a descriptor from its parts.
    pub fn new(
        uri: impl Into<String>,
        name: impl Into<String>,
        mime_type: impl Into<String>,
        handler: Arc<dyn ResourceHandler>,
    ) -> Self {
        Self {
            uri: uri.into(),
            name: name.into(),
            description: None,
            mime_type: mime_type.into(),
            handler,
        }
    }

    /// Attach a human-readable description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn handler(&self) -> &Arc<dyn ResourceHandler> {
        &self.handler
    }

    /// Listing entry for `resources/list`.
    pub fn info(&self) -> ResourceInfo {
        ResourceInfo {
            uri: self.uri.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            mime_type: self.mime_type.clone(),
        }
    }
}

impl std::fmt::Debug for ResourceDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceDescriptor")
            .field("uri", &self.uri)
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Name → descriptor store for tools and resources.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    tools: BTreeMap<String, ToolDescriptor>,
    resources: BTreeMap<String, ResourceDescriptor>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any tool with the same name.
    ///
    /// Returns the replaced descriptor, if any.
    pub fn register_tool(&mut self, tool: ToolDescriptor) -> Option<ToolDescriptor> {
        debug!("Registering tool: {}", tool.name);
        let previous = self.tools.insert(tool.name.clone(), tool);
        if let Some(previous) = &previous {
            warn!("Tool '{}' registered twice, keeping the latest", previous.name);
        }
        previous
    }

    /// Register a tool, failing if the name is already taken.
    pub fn try_register_tool(&mut self, tool: ToolDescriptor) -> Result<(), RegistryError> {
        if self.tools.contains_key(&tool.name) {
            return Err(RegistryError::DuplicateTool(tool.name));
        }
        self.register_tool(tool);
        Ok(())
    }

    /// Register a resource, replacing any resource with the same URI.
    ///
    /// Returns the replaced descriptor, if any.
    pub fn register_resource(&mut self, resource: ResourceDescriptor) -> Option<ResourceDescriptor> {
        debug!("Registering resource: {}", resource.uri);
        let previous = self.resources.insert(resource.uri.clone(), resource);
        if let Some(previous) = &previous {
            warn!("Resource '{}' registered twice, keeping the latest", previous.uri);
        }
        previous
    }

    /// Register a resource, failing if the URI is already taken.
    pub fn try_register_resource(&mut self, resource: ResourceDescriptor) -> Result<(), RegistryError> {
        if self.resources.contains_key(&resource.uri) {
            return Err(RegistryError::DuplicateResource(resource.uri));
        }
        self.register_resource(resource);
        Ok(())
    }

    /// Look up a tool by name.
    pub fn lookup_tool(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.get(name)
    }

    /// Look up a resource by URI.
    pub fn lookup_resource(&self, uri: &str) -> Option<&ResourceDescriptor> {
        self.resources.get(uri)
    }

    /// Remove a tool.
    pub fn unregister_tool(&mut self, name: &str) -> Option<ToolDescriptor> {
        self.tools.remove(name)
    }

    /// Remove a resource.
    pub fn unregister_resource(&mut self, uri: &str) -> Option<ResourceDescriptor> {
        self.resources.remove(uri)
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.tools.clear();
        self.resources.clear();
    }

    /// All tools, ordered by name.
    pub fn tools(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.tools.values()
    }

    /// All resources, ordered by URI.
    pub fn resources(&self) -> impl Iterator<Item = &ResourceDescriptor> {
        self.resources.values()
    }

    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }
}

/// Generate the JSON schema object for an argument type.
fn schema_object_for<A: JsonSchema>() -> JsonObject {
    match schemars::schema_for!(A).to_value() {
        serde_json::Value::Object(mut schema) => {
            schema.remove("$schema");
            schema
        }
        _ => JsonObject::new(),
    }
}
