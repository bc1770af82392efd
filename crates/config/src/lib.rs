//! Scenario data model and validation for the AsyncFlow simulation engine.
//!
//! This crate defines the typed, `serde`-deserializable scenario object
//! `spec.md` §6 describes and the validation pass §6/§4.10 require as a
//! precondition to running the engine. It does **not** parse YAML, read
//! files, or expose a CLI — those are external collaborators per `spec.md`
//! §1.

pub mod error;
pub mod events;
pub mod ids;
pub mod rv;
pub mod scenario;
pub mod settings;
pub mod step;
pub mod topology;

pub use error::{ValidationError, ValidationErrors};
pub use events::{EventInjection, EventKind};
pub use ids::{ClientId, EdgeId, EventId, GeneratorId, LoadBalancerId, ServerId};
pub use rv::{Distribution, RVConfig};
pub use scenario::Scenario;
pub use settings::SimulationSettings;
pub use step::{Endpoint, Step, StepKind};
pub use topology::{Client, Edge, LbAlgorithm, LoadBalancer, RqsGenerator, Server, ServerResources, TopologyGraph};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn minimal_scenario() -> Scenario {
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
                    server_resources: ServerResources { cpu_cores: 1, ram_mb: 256, db_connection_pool: None },
                    endpoints: vec![Endpoint {
                        name: "/x".into(),
                        steps: vec![Step::Cpu { kind: StepKind::CpuBoundOperation, time_s: 0.001 }],
                    }],
                }],
                load_balancer: None,
                edges: vec![
                    Edge {
                        id: EdgeId::from("e1"),
                        source: "gen".into(),
                        target: "client".into(),
                        latency: RVConfig::log_normal(0.01, 0.0),
                        dropout_rate: 0.0,
                    },
                    Edge {
                        id: EdgeId::from("e2"),
                        source: "client".into(),
                        target: "srv1".into(),
                        latency: RVConfig::log_normal(0.01, 0.0),
                        dropout_rate: 0.0,
                    },
                    Edge {
                        id: EdgeId::from("e3"),
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

    #[test]
    fn minimal_scenario_validates() {
        let scenario = minimal_scenario();
        assert!(scenario.validate().is_ok());
    }

    #[test]
    fn self_loop_is_rejected() {
        let mut scenario = minimal_scenario();
        scenario.topology.edges[1].target = "client".into();
        scenario.topology.edges[1].source = "client".into();
        let err = scenario.validate().unwrap_err();
        assert!(err
            .errors
            .iter()
            .any(|e| matches!(e, ValidationError::SelfLoop { .. })));
    }

    #[test]
    fn lb_coverage_without_edge_is_rejected() {
        let mut scenario = minimal_scenario();
        scenario.topology.load_balancer = Some(LoadBalancer {
            id: LoadBalancerId::from("lb"),
            algorithm: LbAlgorithm::RoundRobin,
            server_covered: BTreeSet::from([ServerId::from("srv1")]),
        });
        let err = scenario.validate().unwrap_err();
        assert!(err
            .errors
            .iter()
            .any(|e| matches!(e, ValidationError::LbMissingCoverageEdge { .. })));
    }

    #[test]
    fn dangling_edge_target_is_rejected() {
        let mut scenario = minimal_scenario();
        scenario.topology.edges[1].target = "ghost".into();
        let err = scenario.validate().unwrap_err();
        assert!(err
            .errors
            .iter()
            .any(|e| matches!(e, ValidationError::DanglingEdgeTarget { .. })));
    }

    #[test]
    fn server_with_no_outgoing_edge_is_rejected() {
        let mut scenario = minimal_scenario();
        scenario.topology.edges.remove(2); // drop the srv1 -> client edge
        let err = scenario.validate().unwrap_err();
        assert!(err
            .errors
            .iter()
            .any(|e| matches!(e, ValidationError::ServerMissingOutgoingEdge(id) if id == "srv1")));
    }

    #[test]
    fn overlapping_outages_on_the_same_server_are_not_cleared_early() {
        let mut scenario = minimal_scenario();
        scenario.settings = SimulationSettings::new(20.0, 0.01);
        scenario.topology.servers.push(Server {
            id: ServerId::from("srv2"),
            server_resources: ServerResources { cpu_cores: 1, ram_mb: 256, db_connection_pool: None },
            endpoints: vec![Endpoint {
                name: "/x".into(),
                steps: vec![Step::Cpu { kind: StepKind::CpuBoundOperation, time_s: 0.001 }],
            }],
        });
        scenario.topology.edges.push(Edge {
            id: EdgeId::from("e4"),
            source: "client".into(),
            target: "srv2".into(),
            latency: RVConfig::log_normal(0.01, 0.0),
            dropout_rate: 0.0,
        });
        scenario.topology.edges.push(Edge {
            id: EdgeId::from("e5"),
            source: "srv2".into(),
            target: "client".into(),
            latency: RVConfig::log_normal(0.01, 0.0),
            dropout_rate: 0.0,
        });
        // srv1 has two overlapping outage windows, [1,5) and [3,8); a
        // depth-unaware sweep clears srv1 from the "down" set at t=5 even
        // though the second window keeps it down until t=8. srv2 then goes
        // down at [6,7), which is a genuine both-down instant at t=6 that
        // must not be missed.
        scenario.events.push(EventInjection {
            event_id: EventId::from("outage_a"),
            target_id: "srv1".into(),
            start: 1.0,
            end: 5.0,
            spike_s: None,
        });
        scenario.events.push(EventInjection {
            event_id: EventId::from("outage_b"),
            target_id: "srv1".into(),
            start: 3.0,
            end: 8.0,
            spike_s: None,
        });
        scenario.events.push(EventInjection {
            event_id: EventId::from("outage_c"),
            target_id: "srv2".into(),
            start: 6.0,
            end: 7.0,
            spike_s: None,
        });
        let err = scenario.validate().unwrap_err();
        assert!(
            err.errors
                .iter()
                .any(|e| matches!(e, ValidationError::AllServersDownAt { at } if *at == 6.0)),
            "expected an all-servers-down instant at t=6: {err:?}"
        );
    }
}
