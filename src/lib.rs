//! AsyncFlow: a discrete-event simulator that builds a digital twin of an
//! asynchronous backend service for capacity-planning questions — p95/p99
//! latency, throughput, queue depths, RAM pressure — without running a real
//! load test (`spec.md` §1).
//!
//! This crate is a thin facade over [`asyncflow_config`] (the scenario
//! model) and [`asyncflow_engine`] (the simulation core) for downstream
//! embedding. Scenario ingestion (YAML, a CLI, an HTTP API) is an explicit
//! external collaborator and is not built here (`spec.md` §1 "Non-goals").

pub use asyncflow_config::{
    Client, ClientId, Distribution, Edge, EdgeId, Endpoint, EventId, EventInjection, EventKind,
    GeneratorId, LbAlgorithm, LoadBalancer, LoadBalancerId, RVConfig, RqsGenerator, Scenario,
    Server, ServerId, ServerResources, SimulationSettings, Step, StepKind, TopologyGraph,
    ValidationError, ValidationErrors,
};
pub use asyncflow_engine::{ComponentKind, EngineError, Hop, RequestState, RunError, RunResults, Runner};
pub use asyncflow_telemetry::init_tracing;
