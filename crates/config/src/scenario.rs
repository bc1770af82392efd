//! The top-level `Scenario` object the engine consumes (`spec.md` §6).

use crate::events::EventInjection;
use crate::settings::SimulationSettings;
use crate::topology::{RqsGenerator, TopologyGraph};
use serde::{Deserialize, Serialize};

/// A fully-described, not-yet-validated simulation scenario. Call
/// [`Scenario::validate`] before handing it to `asyncflow_engine::Runner`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub workload: RqsGenerator,
    pub topology: TopologyGraph,
    pub settings: SimulationSettings,
    #[serde(default)]
    pub events: Vec<EventInjection>,
}
