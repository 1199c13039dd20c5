//! System metrics capability.
//!
//! The demo dashboard shows simulated load figures: CPU and memory are random
//! percentages, only uptime is real.

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};
use std::ops::RangeInclusive;
use std::time::{Duration, Instant};

/// One reading of the host metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSample {
    pub cpu_percent: u8,
    pub memory_percent: u8,
    pub uptime: Duration,
}

impl MetricsSample {
    pub fn cpu_label(&self) -> String {
        format!("{}%", self.cpu_percent)
    }

    pub fn memory_label(&self) -> String {
        format!("{}%", self.memory_percent)
    }

    /// Whole seconds, e.g. `42s`.
    pub fn uptime_label(&self) -> String {
        format!("{}s", self.uptime.as_secs())
    }
}

/// Source of host metrics.
pub trait MetricsSource: Send + Sync {
    fn sample(&self) -> MetricsSample;
}

/// CPU range of the simulated load.
pub const CPU_RANGE: RangeInclusive<u8> = 20..=79;

/// Memory range of the simulated load.
pub const MEMORY_RANGE: RangeInclusive<u8> = 40..=79;

/// Simulated load with real uptime, measured from construction.
#[derive(Debug, Clone)]
pub struct ProcessMetrics {
    started: Instant,
}

impl ProcessMetrics {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for ProcessMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsSource for ProcessMetrics {
    fn sample(&self) -> MetricsSample {
        MetricsSample {
            cpu_percent: random_in(CPU_RANGE),
            memory_percent: random_in(MEMORY_RANGE),
            uptime: self.started.elapsed(),
        }
    }
}

/// Fixed readings.
#[derive(Debug, Clone, Copy)]
pub struct StaticMetrics(pub MetricsSample);

impl MetricsSource for StaticMetrics {
    fn sample(&self) -> MetricsSample {
        self.0
    }
}

/// Uniform-enough pick from `range` for the simulated readings.
///
/// Each `RandomState` carries its own randomly seeded SipHash keys, so the
/// hash of an empty input differs between calls. The figures are display
/// values only: the modulo bias and the lack of a seedable generator do
/// not matter here, and tests use [`StaticMetrics`] when they need fixed
/// readings.
fn random_in(range: RangeInclusive<u8>) -> u8 {
    let (low, high) = (*range.start(), *range.end());
    let hasher = RandomState::new().build_hasher();
    let span = u64::from(high - low) + 1;
    low + (hasher.finish() % span) as u8
}
