//! Topology graph (`spec.md` §3, §6 "TopologyGraph").

use crate::ids::{ClientId, EdgeId, GeneratorId, LoadBalancerId, ServerId};
use crate::rv::RVConfig;
use crate::step::Endpoint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Per-server CPU/RAM resource limits (`spec.md` §3 "Server").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServerResources {
    pub cpu_cores: u32,
    pub ram_mb: u32,
    /// Advisory only — not consumed by the core engine (`spec.md` marks this
    /// optional in §6); carried through for downstream tooling.
    #[serde(default)]
    pub db_connection_pool: Option<u32>,
}

/// A server node: a CPU/RAM-bounded handler of one endpoint per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub id: ServerId,
    pub server_resources: ServerResources,
    pub endpoints: Vec<Endpoint>,
}

/// Load-balancing algorithm (`spec.md` §6 "Enumerations").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LbAlgorithm {
    RoundRobin,
    LeastConnection,
}

/// Optional load balancer fronting a subset of servers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadBalancer {
    pub id: LoadBalancerId,
    pub algorithm: LbAlgorithm,
    pub server_covered: BTreeSet<ServerId>,
}

/// The single client node (`spec.md` §6: "single Client").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
}

/// A directed network link between two declared nodes (`spec.md` §3 "Edge").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: String,
    pub target: String,
    pub latency: RVConfig,
    pub dropout_rate: f64,
}

/// The full topology graph: client, servers, optional load balancer, edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologyGraph {
    pub client: Client,
    pub servers: Vec<Server>,
    #[serde(default)]
    pub load_balancer: Option<LoadBalancer>,
    pub edges: Vec<Edge>,
}

/// The traffic generator that produces inter-arrival gaps
/// (`spec.md` §6 "Workload").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RqsGenerator {
    pub id: GeneratorId,
    pub avg_active_users: RVConfig,
    pub avg_request_per_minute_per_user: RVConfig,
    pub user_sampling_window: u32,
}
