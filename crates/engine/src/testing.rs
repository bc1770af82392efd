//! Minimal in-process scenario builders for the concrete scenarios
//! `spec.md` §8 enumerates, mirroring `otap-df-engine::testing`'s
//! hand-built fixtures rather than a YAML loader this crate doesn't have.

use asyncflow_config::{
    Client, ClientId, Edge, EdgeId, Endpoint, EventId, EventInjection, GeneratorId, LbAlgorithm,
    LoadBalancer, LoadBalancerId, RVConfig, RqsGenerator, Scenario, Server, ServerId,
    ServerResources, SimulationSettings, Step, StepKind, TopologyGraph,
};
use std::collections::BTreeSet;

/// One server, one client, a constant-rate Poisson/Poisson generator
/// (`spec.md` §8 scenario 1 "Single-server smoke").
pub fn single_server_smoke() -> Scenario {
    Scenario {
        workload: RqsGenerator {
            id: GeneratorId::from("gen"),
            avg_active_users: RVConfig::poisson(1.0),
            avg_request_per_minute_per_user: RVConfig::poisson(1.0),
            user_sampling_window: 10,
        },
        topology: TopologyGraph {
            client: Client { id: ClientId::from("client") },
            servers: vec![Server {
                id: ServerId::from("srv1"),
                server_resources: ServerResources {
                    cpu_cores: 1,
                    ram_mb: 256,
                    db_connection_pool: None,
                },
                endpoints: vec![Endpoint {
                    name: "/x".into(),
                    steps: vec![Step::Cpu {
                        kind: StepKind::CpuBoundOperation,
                        time_s: 0.001,
                    }],
                }],
            }],
            load_balancer: None,
            edges: vec![
                Edge {
                    id: EdgeId::from("gen_client"),
                    source: "gen".into(),
                    target: "client".into(),
                    latency: RVConfig::log_normal(0.01, 0.0),
                    dropout_rate: 0.0,
                },
                Edge {
                    id: EdgeId::from("client_srv1"),
                    source: "client".into(),
                    target: "srv1".into(),
                    latency: RVConfig::log_normal(0.01, 0.0),
                    dropout_rate: 0.0,
                },
                Edge {
                    id: EdgeId::from("srv1_client"),
                    source: "srv1".into(),
                    target: "client".into(),
                    latency: RVConfig::log_normal(0.01, 0.0),
                    dropout_rate: 0.0,
                },
            ],
        },
        settings: SimulationSettings::new(10.0, 0.01),
        events: vec![],
    }
}

/// A single `client -> server` edge with `dropout_rate = 1.0`
/// (`spec.md` §8 scenario 2 "Dropout terminal").
pub fn dropout_terminal() -> Scenario {
    let mut scenario = single_server_smoke();
    for edge in &mut scenario.topology.edges {
        if edge.id.0 == "client_srv1" {
            edge.dropout_rate = 1.0;
        }
    }
    scenario
}

/// A round-robin load balancer fronting two identical servers at a constant
/// rate (`spec.md` §8 scenario 3 "LB round-robin fairness").
pub fn lb_round_robin_fairness() -> Scenario {
    let endpoint = || Endpoint {
        name: "/x".into(),
        steps: vec![Step::Cpu {
            kind: StepKind::CpuBoundOperation,
            time_s: 0.001,
        }],
    };
    let server = |id: &str| Server {
        id: ServerId::from(id),
        server_resources: ServerResources {
            cpu_cores: 1,
            ram_mb: 256,
            db_connection_pool: None,
        },
        endpoints: vec![endpoint()],
    };

    Scenario {
        workload: RqsGenerator {
            id: GeneratorId::from("gen"),
            avg_active_users: RVConfig::poisson(10.0),
            avg_request_per_minute_per_user: RVConfig::poisson(60.0),
            user_sampling_window: 10,
        },
        topology: TopologyGraph {
            client: Client { id: ClientId::from("client") },
            servers: vec![server("srv1"), server("srv2")],
            load_balancer: Some(LoadBalancer {
                id: LoadBalancerId::from("lb"),
                algorithm: LbAlgorithm::RoundRobin,
                server_covered: BTreeSet::from([ServerId::from("srv1"), ServerId::from("srv2")]),
            }),
            edges: vec![
                Edge {
                    id: EdgeId::from("gen_client"),
                    source: "gen".into(),
                    target: "client".into(),
                    latency: RVConfig::log_normal(0.01, 0.0),
                    dropout_rate: 0.0,
                },
                Edge {
                    id: EdgeId::from("client_lb"),
                    source: "client".into(),
                    target: "lb".into(),
                    latency: RVConfig::log_normal(0.01, 0.0),
                    dropout_rate: 0.0,
                },
                Edge {
                    id: EdgeId::from("lb_srv1"),
                    source: "lb".into(),
                    target: "srv1".into(),
                    latency: RVConfig::log_normal(0.01, 0.0),
                    dropout_rate: 0.0,
                },
                Edge {
                    id: EdgeId::from("lb_srv2"),
                    source: "lb".into(),
                    target: "srv2".into(),
                    latency: RVConfig::log_normal(0.01, 0.0),
                    dropout_rate: 0.0,
                },
                Edge {
                    id: EdgeId::from("srv1_client"),
                    source: "srv1".into(),
                    target: "client".into(),
                    latency: RVConfig::log_normal(0.01, 0.0),
                    dropout_rate: 0.0,
                },
                Edge {
                    id: EdgeId::from("srv2_client"),
                    source: "srv2".into(),
                    target: "client".into(),
                    latency: RVConfig::log_normal(0.01, 0.0),
                    dropout_rate: 0.0,
                },
            ],
        },
        settings: SimulationSettings::new(60.0, 0.01),
        events: vec![],
    }
}

/// Adds a server-outage window to `scenario` on `server_id`
/// (`spec.md` §8 scenario 5 "Server outage rejoin").
pub fn with_server_outage(mut scenario: Scenario, server_id: &str, start: f64, end: f64) -> Scenario {
    scenario.events.push(EventInjection {
        event_id: EventId::from("outage"),
        target_id: server_id.to_string(),
        start,
        end,
        spike_s: None,
    });
    scenario
}
