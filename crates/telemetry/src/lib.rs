//! Tracing setup for AsyncFlow binaries and tests.
//!
//! Grounded on `otap-df-telemetry`'s `TracingSetup`, trimmed to what a
//! pure simulation library needs: a `tracing_subscriber::fmt` subscriber
//! driven by an `EnvFilter`. There is no metrics-export backend here — the
//! engine's own sampled/event metrics pipeline (`spec.md` §4.12–§4.14) is
//! the run's observability surface, not OTLP/Prometheus.

use tracing_subscriber::EnvFilter;

/// Installs a process-global `tracing` subscriber with the given default
/// filter directive (used when `RUST_LOG` is unset). Calling this more than
/// once is a no-op after the first call succeeds.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
