//! Validation errors for a [`crate::scenario::Scenario`].
//!
//! One variant per rule in `spec.md` §6 ("Graph validation") and §4.10
//! ("Validation requirements"); `ValidationErrors` accumulates every
//! violation found in a single pass rather than failing on the first one,
//! the way `otap-df-config::error::Error::InvalidConfiguration` aggregates.

/// A single violated rule, naming the offending id/field.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("duplicate server id `{0}`")]
    DuplicateServerId(String),

    #[error("duplicate edge id `{0}`")]
    DuplicateEdgeId(String),

    #[error("duplicate event id `{0}`")]
    DuplicateEventId(String),

    #[error("edge `{edge}` targets undeclared node `{target}`")]
    DanglingEdgeTarget { edge: String, target: String },

    #[error("edge `{edge}` has the generator as its target; the generator may only be a source")]
    GeneratorAsTarget { edge: String },

    #[error("edge `{edge}` is a self-loop (`{node}` -> `{node}`)")]
    SelfLoop { edge: String, node: String },

    #[error("load balancer `{lb}` covers undeclared server `{server}`")]
    LbCoversUnknownServer { lb: String, server: String },

    #[error("load balancer `{lb}` covers server `{server}` but no LB -> server edge exists")]
    LbMissingCoverageEdge { lb: String, server: String },

    #[error("node `{node}` has {count} outgoing edges; only the load balancer may fan out")]
    IllegalFanOut { node: String, count: usize },

    #[error("server `{0}` has no outgoing edge")]
    ServerMissingOutgoingEdge(String),

    #[error("workload generator's avg_request_per_minute_per_user must be Poisson")]
    RpmNotPoisson,

    #[error("workload generator's avg_active_users must be Poisson or Normal")]
    ActiveUsersBadDistribution,

    #[error("user_sampling_window must be within [1, 120] seconds, got {0}")]
    SamplingWindowOutOfRange(u32),

    #[error("total_simulation_time must be >= 5s, got {0}")]
    TotalSimulationTimeTooSmall(f64),

    #[error("sample_period_s must be within [0.001, 0.1], got {0}")]
    SamplePeriodOutOfRange(f64),

    #[error("enabled_sample_metrics is missing mandatory metric `{0}`")]
    MissingMandatorySampleMetric(String),

    #[error("enabled_event_metrics is missing mandatory metric `{0}`")]
    MissingMandatoryEventMetric(String),

    #[error("server `{0}` must have cpu_cores >= 1")]
    ServerNoCpuCores(String),

    #[error("server `{0}` must have ram_mb >= 256")]
    ServerRamTooSmall(String),

    #[error("edge `{0}` latency mean must be > 0")]
    EdgeLatencyMeanNotPositive(String),

    #[error("edge `{0}` latency variance must be >= 0")]
    EdgeLatencyVarianceNegative(String),

    #[error("edge `{0}` dropout_rate must be within [0, 1]")]
    EdgeDropoutOutOfRange(String),

    #[error("step with non-positive time_s in endpoint `{endpoint}` of server `{server}`")]
    StepNonPositiveTime { server: String, endpoint: String },

    #[error("step with zero RAM in endpoint `{endpoint}` of server `{server}`")]
    StepZeroRam { server: String, endpoint: String },

    #[error("event `{event}` references undeclared target `{target}`")]
    EventDanglingTarget { event: String, target: String },

    #[error("event `{event}` must satisfy start < end ({start} >= {end})")]
    EventBadWindow { event: String, start: f64, end: f64 },

    #[error("event `{event}` window must lie within [0, total_simulation_time]")]
    EventWindowOutOfBounds { event: String },

    #[error("network-spike event `{event}` must declare spike_s > 0")]
    EventMissingSpike { event: String },

    #[error("all covered servers are simultaneously down at t={at}")]
    AllServersDownAt { at: f64 },
}

/// Every violation found in one validation pass.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("scenario failed validation with {} error(s): {errors:?}", errors.len())]
pub struct ValidationErrors {
    pub errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}
