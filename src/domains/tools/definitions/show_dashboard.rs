//! Show dashboard tool definition.
//!
//! Reports a snapshot of the host metrics as JSON text and embeds the
//! dashboard app.

use serde::Serialize;
use tracing::{info, instrument};

use crate::core::content::{Content, ContentEnvelope};
use crate::core::handlers::{NoArgs, ToolError};
use crate::core::registry::ToolDescriptor;
use crate::domains::host::{Clock, HostServices, MetricsSource, format_timestamp};
use crate::domains::resources::ResourceDefinition;
use crate::domains::resources::definitions::DashboardUiResource;

/// Text payload of the dashboard tool.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub cpu: String,
    pub memory: String,
    pub uptime: String,
    pub timestamp: String,
}

/// Show dashboard tool - metrics snapshot plus the dashboard UI.
pub struct ShowDashboardTool;

impl ShowDashboardTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "show-dashboard";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Shows an interactive system metrics dashboard with CPU, memory, and traffic data.";

    /// Take a metrics snapshot.
    pub fn snapshot(metrics: &dyn MetricsSource, clock: &dyn Clock) -> DashboardSnapshot {
        let sample = metrics.sample();
        DashboardSnapshot {
            cpu: sample.cpu_label(),
            memory: sample.memory_label(),
            uptime: sample.uptime_label(),
            timestamp: format_timestamp(clock.now()),
        }
    }

    /// Execute the tool logic.
    #[instrument(skip_all)]
    pub fn execute(metrics: &dyn MetricsSource, clock: &dyn Clock) -> Result<ContentEnvelope, ToolError> {
        let snapshot = Self::snapshot(metrics, clock);
        info!("Show dashboard tool called: cpu={} memory={}", snapshot.cpu, snapshot.memory);

        Ok(ContentEnvelope::new(vec![
            Content::text(serde_json::to_string(&snapshot)?),
            DashboardUiResource::embedded(),
        ]))
    }

    /// Registry entry bound to the given host services.
    pub fn descriptor(services: &HostServices) -> ToolDescriptor {
        let HostServices { clock, metrics } = services.clone();
        ToolDescriptor::from_fn(Self::NAME, Self::DESCRIPTION, move |_: NoArgs| {
            std::future::ready(Self::execute(metrics.as_ref(), clock.as_ref()))
        })
    }
}
