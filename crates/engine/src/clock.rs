//! Virtual-time clock (`spec.md` §4.1).
//!
//! AsyncFlow commits to design option (c) from `spec.md` §9: a `tokio`
//! current-thread runtime with `time::pause()` engaged. Every suspension
//! point in the spec (`timeout(Δ)`, mailbox `get`, resource `acquire`) is a
//! real `.await` on that runtime; because the clock is paused, tokio
//! auto-advances virtual time to the next pending timer exactly when no
//! task is runnable, which is the `(time, sequence_number)` priority queue
//! `spec.md` §4.1 calls for — supplied by the runtime instead of hand-rolled.

use std::time::Duration;
use tokio::time::Instant;

/// Wall-clock-free "now", expressed in the `f64` seconds used throughout the
/// data model (`spec.md` §3 "Virtual time T").
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    origin: Instant,
}

impl Clock {
    /// Captures the current (paused) tokio instant as t=0 for this run.
    /// Must be called after `tokio::time::pause()`.
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Current virtual time in seconds since the run started.
    pub fn now(&self) -> f64 {
        Instant::now().saturating_duration_since(self.origin).as_secs_f64()
    }

    /// Suspends the calling task until `delta_s` seconds of virtual time
    /// have elapsed. `delta_s <= 0` resolves on the next scheduler turn
    /// without advancing the clock.
    pub async fn timeout(&self, delta_s: f64) {
        if delta_s <= 0.0 {
            tokio::task::yield_now().await;
            return;
        }
        tokio::time::sleep(Duration::from_secs_f64(delta_s)).await;
    }
}
