//! The in-engine metrics pipeline (`spec.md` §4.12–§4.14): the sampled
//! metric collector, the event metric store, and the post-run analyzer.
//! This is the substitute for an OTLP/Prometheus export backend — the spec
//! explicitly keeps those external, so the only observability surface this
//! crate ships is this in-process pipeline.

pub mod analyzer;
pub mod event_store;
pub mod sampled;

pub use analyzer::{Analyzer, LatencyStats};
pub use event_store::EventMetricStore;
pub use sampled::SampledCollector;
