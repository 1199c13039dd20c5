//! Host services domain.
//!
//! Capabilities the tools read from the environment, injected at
//! registration time so tests can substitute deterministic sources.

mod clock;
mod metrics;

use std::sync::Arc;

pub use clock::{Clock, FixedClock, SystemClock, format_timestamp};
pub use metrics::{
    CPU_RANGE, MEMORY_RANGE, MetricsSample, MetricsSource, ProcessMetrics, StaticMetrics,
};

/// Capabilities shared by the tool handlers.
#[derive(Clone)]
pub struct HostServices {
    pub clock: Arc<dyn Clock>,
    pub metrics: Arc<dyn MetricsSource>,
}

impl HostServices {
    pub fn new(clock: Arc<dyn Clock>, metrics: Arc<dyn MetricsSource>) -> Self {
        Self { clock, metrics }
    }

    /// Production services: system clock and simulated process metrics.
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(ProcessMetrics::new()))
    }
}

impl std::fmt::Debug for HostServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostServices").finish_non_exhaustive()
    }
}
