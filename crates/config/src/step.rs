//! Endpoint step chain (`spec.md` §3 "Endpoint", "Step").

use serde::{Deserialize, Serialize};

/// Observability tag on a step; behavior depends only on the `Step` variant,
/// never on the kind (`spec.md` §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    InitialParsing,
    CpuBoundOperation,
    IoTaskSpawn,
    IoLlm,
    IoWait,
    IoDb,
    IoCache,
}

impl StepKind {
    /// The `Step` variant this kind is only ever attached to.
    pub fn matches_variant(self, step: &Step) -> bool {
        match (self, step) {
            (StepKind::InitialParsing | StepKind::CpuBoundOperation, Step::Cpu { .. }) => true,
            (
                StepKind::IoTaskSpawn | StepKind::IoLlm | StepKind::IoWait | StepKind::IoDb
                | StepKind::IoCache,
                Step::Io { .. },
            ) => true,
            _ => false,
        }
    }
}

/// One step of an endpoint's execution chain. Exactly one of CPU time, RAM
/// amount, or I/O wait (`spec.md` §3).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step_kind_group", rename_all = "snake_case")]
pub enum Step {
    /// Holds a CPU core for `time_s` seconds (`time_s > 0`).
    Cpu { kind: StepKind, time_s: f64 },
    /// Reserves `mb` megabytes of RAM for the endpoint's whole execution
    /// (`mb > 0`); a no-op at execution time, see `spec.md` §4.8 step 5.
    Ram { mb: u32 },
    /// Waits `time_s` seconds without holding a CPU core (`time_s > 0`).
    Io { kind: StepKind, time_s: f64 },
}

impl Step {
    /// RAM contribution of this step, `0` for non-`Ram` steps.
    pub fn ram_mb(&self) -> u32 {
        match self {
            Step::Ram { mb } => *mb,
            _ => 0,
        }
    }
}

/// An ordered chain of steps reachable under a canonical lowercase name
/// (`spec.md` §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub name: String,
    pub steps: Vec<Step>,
}

impl Endpoint {
    /// Total RAM the endpoint reserves before executing any step
    /// (`spec.md` §4.4, §4.8 step 3).
    pub fn total_ram_mb(&self) -> u32 {
        self.steps.iter().map(Step::ram_mb).sum()
    }
}
