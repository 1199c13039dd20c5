//! MCP Server implementation and lifecycle management.
//!
//! [`McpServer`] owns the configuration and the dispatcher built over the
//! start-up registry. Transports hand it decoded requests; it answers with
//! protocol results or a [`DispatchError`].
//!
//! Adding a tool or resource does not require modifying this file: the
//! registry is filled from `domains::tools::get_all_tools` and
//! `domains::resources::get_all_resources`.

use std::sync::Arc;

use tracing::{info, instrument};

use super::config::Config;
use super::content::CallToolResult;
use super::dispatch::{DispatchError, Dispatcher};
use super::error::Result;
use super::protocol::{
    Implementation, InitializeParams, InitializeResult, JsonObject, LATEST_PROTOCOL_VERSION,
    ListResourcesResult, ListToolsResult, ReadResourceResult, SUPPORTED_PROTOCOL_VERSIONS,
    ServerCapabilities,
};
use super::registry::Registry;
use crate::domains::host::HostServices;
use crate::domains::{resources, tools};

const INSTRUCTIONS: &str = "Demo MCP Apps server. Call get-time for an interactive clock or \
     show-dashboard for a system metrics dashboard; each tool embeds its HTML app as a resource.";

/// The main MCP server handler.
#[derive(Debug, Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Dispatcher over the start-up registry.
    dispatcher: Dispatcher,
}

impl McpServer {
    /// Create a new MCP server with the given configuration and the
    /// production host services.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_services(config, &HostServices::system())
    }

    /// Create a server whose tools use the given host services.
    pub fn with_services(config: Config, services: &HostServices) -> Result<Self> {
        let registry = build_registry(services, config.registry.reject_duplicates)?;
        info!(
            "Registered {} tools and {} resources",
            registry.tool_count(),
            registry.resource_count()
        );
        Ok(Self::with_registry(config, registry))
    }

    /// Create a server over an already populated registry.
    pub fn with_registry(config: Config, registry: Registry) -> Self {
        let dispatcher = Dispatcher::with_options(Arc::new(registry), config.dispatch.options());
        Self {
            config: Arc::new(config),
            dispatcher,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Answer the `initialize` handshake.
    #[instrument(skip_all)]
    pub fn initialize(&self, params: &InitializeParams) -> InitializeResult {
        if let Some(client) = &params.client_info {
            info!("Client connected: {} v{}", client.name, client.version);
        }

        InitializeResult {
            protocol_version: negotiate_protocol_version(params.protocol_version.as_deref())
                .to_string(),
            capabilities: ServerCapabilities {
                tools: Some(JsonObject::new()),
                resources: Some(JsonObject::new()),
            },
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }

    pub fn list_tools(&self) -> ListToolsResult {
        ListToolsResult {
            tools: self.dispatcher.list_tools(),
        }
    }

    /// Call a tool and wrap its content for the wire.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> std::result::Result<CallToolResult, DispatchError> {
        let envelope = self.dispatcher.invoke(name, arguments).await?;
        envelope
            .into_call_result()
            .map_err(|e| DispatchError::encode(format!("tool '{name}' returned no content: {e}")))
    }

    pub fn list_resources(&self) -> ListResourcesResult {
        ListResourcesResult {
            resources: self.dispatcher.list_resources(),
        }
    }

    pub async fn read_resource(
        &self,
        uri: &str,
    ) -> std::result::Result<ReadResourceResult, DispatchError> {
        self.dispatcher.read_resource(uri).await
    }
}

/// Fill a registry with every tool and resource of the domains.
///
/// In strict mode a repeated name or URI aborts with a registry error;
/// otherwise the latest registration wins.
pub fn build_registry(services: &HostServices, strict: bool) -> Result<Registry> {
    let mut registry = Registry::new();

    for tool in tools::get_all_tools(services) {
        if strict {
            registry.try_register_tool(tool)?;
        } else {
            registry.register_tool(tool);
        }
    }

    for resource in resources::get_all_resources() {
        if strict {
            registry.try_register_resource(resource)?;
        } else {
            registry.register_resource(resource);
        }
    }

    Ok(registry)
}

/// Echo the client's revision when supported, else answer with the latest.
pub fn negotiate_protocol_version(requested: Option<&str>) -> &'static str {
    requested
        .and_then(|v| SUPPORTED_PROTOCOL_VERSIONS.iter().copied().find(|s| *s == v))
        .unwrap_or(LATEST_PROTOCOL_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dispatch::ErrorKind;
    use crate::core::content::ContentEnvelope;
    use crate::core::registry::ToolDescriptor;
    use crate::core::handlers::{NoArgs, ToolError};

    fn server() -> McpServer {
        McpServer::new(Config::default()).unwrap()
    }

    #[test]
    fn test_registers_demo_content() {
        let server = server();
        let tools: Vec<_> = server.list_tools().tools.into_iter().map(|t| t.name).collect();
        assert_eq!(tools, vec!["get-time", "show-dashboard"]);

        let uris: Vec<_> = server
            .list_resources()
            .resources
            .into_iter()
            .map(|r| r.uri)
            .collect();
        assert_eq!(uris, vec!["ui://dashboard/dashboard.html", "ui://get-time/clock.html"]);
    }

    #[test]
    fn test_protocol_negotiation() {
        assert_eq!(negotiate_protocol_version(Some("2024-11-05")), "2024-11-05");
        assert_eq!(negotiate_protocol_version(Some("1999-01-01")), LATEST_PROTOCOL_VERSION);
        assert_eq!(negotiate_protocol_version(None), LATEST_PROTOCOL_VERSION);
    }

    #[test]
    fn test_initialize_reports_server_info() {
        let result = server().initialize(&InitializeParams::default());
        assert_eq!(result.server_info.name, "mcp-apps-demo");
        assert!(result.capabilities.tools.is_some());
        assert!(result.capabilities.resources.is_some());
    }

    #[test]
    fn test_strict_registration_accepts_demo_content() {
        let registry = build_registry(&HostServices::system(), true).unwrap();
        assert_eq!(registry.tool_count(), 2);
        assert_eq!(registry.resource_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_envelope_is_encode_error() {
        let mut registry = Registry::new();
        registry.register_tool(ToolDescriptor::from_fn("silent", "Says nothing", |_: NoArgs| {
            std::future::ready(Ok::<_, ToolError>(ContentEnvelope::default()))
        }));
        let server = McpServer::with_registry(Config::default(), registry);

        let err = server.call_tool("silent", None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransportEncodeError);
    }
}
