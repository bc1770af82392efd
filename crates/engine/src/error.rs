//! Run-time error taxonomy (`spec.md` §7 kinds 2–3).
//!
//! Kinds 4 (Sampling) and 5 (Delivery) are deliberately absent here — they
//! are absorbed in-engine (the generator fast-forwards past a degenerate
//! window, dropout terminates a delivery locally) rather than surfaced as
//! errors.

use asyncflow_config::ValidationErrors;

/// A fatal run-time error (`spec.md` §7 kinds 2 and 3).
#[derive(thiserror::Error, Debug, Clone)]
pub enum EngineError {
    /// A run-time precondition that a validated scenario should have
    /// prevented, e.g. an empty load balancer live set.
    #[error("configuration error: {detail}")]
    Configuration { detail: String },

    /// An internal consistency violation: counter underflow, RAM
    /// over-release, a missing target mailbox. Always a bug, never a user
    /// error (`spec.md` §7 kind 3).
    #[error("simulation consistency error at t={at}: {detail}")]
    Consistency {
        detail: String,
        request_id: Option<u64>,
        at: f64,
    },
}

/// Everything [`crate::runner::Runner::run`] can return besides a result.
#[derive(thiserror::Error, Debug, Clone)]
pub enum RunError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The run did not reach `total_simulation_time` within the wall-clock
    /// deadline (`spec.md` §4.1 "run_until").
    #[error("run exceeded its deadline before total_simulation_time elapsed")]
    Deadline,
}
