//! Get time tool definition.
//!
//! Reports the server time and embeds the interactive clock app.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::core::content::{Content, ContentEnvelope};
use crate::core::handlers::{NoArgs, ToolError};
use crate::core::registry::ToolDescriptor;
use crate::domains::host::{Clock, HostServices, format_timestamp};
use crate::domains::resources::ResourceDefinition;
use crate::domains::resources::definitions::ClockUiResource;

/// Get time tool - current server time plus the clock UI.
pub struct GetTimeTool;

impl GetTimeTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get-time";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Shows an interactive clock with current time. Returns both server time and a rich interactive clock UI.";

    /// Execute the tool logic.
    #[instrument(skip_all)]
    pub fn execute(clock: &dyn Clock) -> ContentEnvelope {
        let now = format_timestamp(clock.now());
        info!("Get time tool called at {}", now);

        ContentEnvelope::new(vec![
            Content::text(format!("Current server time: {now}")),
            ClockUiResource::embedded(),
        ])
    }

    /// Registry entry bound to the given host services.
    pub fn descriptor(services: &HostServices) -> ToolDescriptor {
        let clock = Arc::clone(&services.clock);
        ToolDescriptor::from_fn(Self::NAME, Self::DESCRIPTION, move |_: NoArgs| {
            std::future::ready(Ok::<_, ToolError>(Self::execute(clock.as_ref())))
        })
    }
}
