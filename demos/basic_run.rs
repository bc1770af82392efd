//! Builds a small scenario by hand and runs it — the shape an external
//! ingestion layer (YAML loader, CLI, HTTP handler) would drive the engine
//! through, exercised here directly against the public API.

use asyncflow::{
    Client, Edge, EdgeId, Endpoint, GeneratorId, RVConfig, RqsGenerator, Runner, Scenario, Server,
    ServerId, ServerResources, SimulationSettings, Step, StepKind, TopologyGraph,
};

fn scenario() -> Scenario {
    Scenario {
        workload: RqsGenerator {
            id: GeneratorId::from("gen"),
            avg_active_users: RVConfig::poisson(4.0),
            avg_request_per_minute_per_user: RVConfig::poisson(30.0),
            user_sampling_window: 10,
        },
        topology: TopologyGraph {
            client: Client { id: "client".into() },
            servers: vec![Server {
                id: ServerId::from("srv1"),
                server_resources: ServerResources {
                    cpu_cores: 2,
                    ram_mb: 512,
                    db_connection_pool: None,
                },
                endpoints: vec![Endpoint {
                    name: "/checkout".into(),
                    steps: vec![
                        Step::Ram { mb: 64 },
                        Step::Cpu {
                            kind: StepKind::InitialParsing,
                            time_s: 0.002,
                        },
                        Step::Io {
                            kind: StepKind::IoDb,
                            time_s: 0.02,
                        },
                        Step::Cpu {
                            kind: StepKind::CpuBoundOperation,
                            time_s: 0.005,
                        },
                    ],
                }],
            }],
            load_balancer: None,
            edges: vec![
                Edge {
                    id: EdgeId::from("gen_client"),
                    source: "gen".into(),
                    target: "client".into(),
                    latency: RVConfig::log_normal(0.005, 0.0001),
                    dropout_rate: 0.0,
                },
                Edge {
                    id: EdgeId::from("client_srv1"),
                    source: "client".into(),
                    target: "srv1".into(),
                    latency: RVConfig::log_normal(0.01, 0.0002),
                    dropout_rate: 0.01,
                },
                Edge {
                    id: EdgeId::from("srv1_client"),
                    source: "srv1".into(),
                    target: "client".into(),
                    latency: RVConfig::log_normal(0.01, 0.0002),
                    dropout_rate: 0.0,
                },
            ],
        },
        settings: SimulationSettings::new(30.0, 0.01),
        events: vec![],
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    asyncflow::init_tracing("info");
    tokio::time::pause();

    let results = Runner::new(scenario())
        .with_seed(42)
        .run()
        .await
        .expect("hand-built scenario should validate and run cleanly");

    let stats = results.latency_stats();
    println!(
        "completed {} requests: mean={:.4}s p95={:.4}s p99={:.4}s",
        stats.count, stats.mean, stats.p95, stats.p99
    );
    println!(
        "throughput over 1s buckets: {:?}",
        results.throughput_series(None)
    );
}
