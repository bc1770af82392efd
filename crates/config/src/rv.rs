//! Random-variable configuration carried by the scenario (`spec.md` §6).
//!
//! This module only describes *which* distribution and parameters a field
//! uses; the samplers that consume this config live in `asyncflow-engine`
//! (`spec.md` §4.5) — the config crate never touches an RNG.

use serde::{Deserialize, Serialize};

/// Canonical distribution kinds (`spec.md` §6 "Enumerations").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Distribution {
    Poisson,
    Normal,
    LogNormal,
    Exponential,
    Uniform,
}

/// A random-variable configuration: a distribution tag plus the parameters
/// it needs. `variance` is only meaningful for `Normal`/`LogNormal`;
/// `min`/`max` only for `Uniform`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RVConfig {
    pub distribution: Distribution,
    pub mean: f64,
    #[serde(default)]
    pub variance: Option<f64>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

impl RVConfig {
    /// A fixed-rate Poisson variable — the common case for per-user RPM.
    pub fn poisson(mean: f64) -> Self {
        Self {
            distribution: Distribution::Poisson,
            mean,
            variance: None,
            min: None,
            max: None,
        }
    }

    /// A Normal variable truncated at zero by the sampler (`spec.md` §4.5).
    pub fn normal(mean: f64, variance: f64) -> Self {
        Self {
            distribution: Distribution::Normal,
            mean,
            variance: Some(variance),
            min: None,
            max: None,
        }
    }

    /// A LogNormal variable, used for edge latency (`spec.md` §4.5).
    pub fn log_normal(mean: f64, variance: f64) -> Self {
        Self {
            distribution: Distribution::LogNormal,
            mean,
            variance: Some(variance),
            min: None,
            max: None,
        }
    }
}
