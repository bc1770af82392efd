//! `SimulationSettings` (`spec.md` §6).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Baseline sampled metrics every run must collect (`spec.md` §4.12, §6).
pub const MANDATORY_SAMPLE_METRICS: &[&str] = &[
    "ready_queue_len",
    "event_loop_io_sleep",
    "ram_in_use",
    "edge_concurrent_connection",
];

/// Baseline event metrics every run must collect (`spec.md` §4.13, §6).
pub const MANDATORY_EVENT_METRICS: &[&str] = &["rqs_clock"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSettings {
    pub total_simulation_time: f64,
    pub sample_period_s: f64,
    #[serde(default = "default_sample_metrics")]
    pub enabled_sample_metrics: BTreeSet<String>,
    #[serde(default = "default_event_metrics")]
    pub enabled_event_metrics: BTreeSet<String>,
}

fn default_sample_metrics() -> BTreeSet<String> {
    MANDATORY_SAMPLE_METRICS.iter().map(|s| s.to_string()).collect()
}

fn default_event_metrics() -> BTreeSet<String> {
    MANDATORY_EVENT_METRICS.iter().map(|s| s.to_string()).collect()
}

impl SimulationSettings {
    /// Convenience constructor with the mandatory metric sets enabled and
    /// nothing else.
    pub fn new(total_simulation_time: f64, sample_period_s: f64) -> Self {
        Self {
            total_simulation_time,
            sample_period_s,
            enabled_sample_metrics: default_sample_metrics(),
            enabled_event_metrics: default_event_metrics(),
        }
    }
}
