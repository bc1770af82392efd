//! Event injection schema (`spec.md` §4.10, §6).

use crate::ids::EventId;
use serde::{Deserialize, Serialize};

/// Canonical event kinds (`spec.md` §6 "Enumerations").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    ServerDown,
    ServerUp,
    NetworkSpikeStart,
    NetworkSpikeEnd,
}

/// One planned outage or network-latency spike, declared as a
/// start/end pair over a single target (`spec.md` §4.10).
///
/// The distilled schema names one target id and a `[start, end)` window;
/// `asyncflow-engine` turns a list of these into the two `(t, event_id,
/// target_id, Mark)` timelines §4.10 describes. Whether the window is a
/// server outage or a network spike is inferred from which set `target_id`
/// belongs to — servers vs. edges — at validation time (`spec.md` does not
/// split this into two schema fields, so neither does this type).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventInjection {
    pub event_id: EventId,
    pub target_id: String,
    pub start: f64,
    pub end: f64,
    /// Additive latency in seconds; required (`> 0`) for network-spike
    /// events, meaningless for server outages.
    #[serde(default)]
    pub spike_s: Option<f64>,
}
