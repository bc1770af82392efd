//! The runner (`spec.md` §4.15): builds the topology, wires mailboxes,
//! starts the event injector first, then every actor and the sampler, runs
//! the clock to `total_simulation_time`, and returns the results object.

use crate::clock::Clock;
use crate::client::ClientRuntime;
use crate::edge::EdgeRuntime;
use crate::error::{EngineError, RunError};
use crate::generator::GeneratorRuntime;
use crate::injector::EventInjector;
use crate::lb::LoadBalancerRuntime;
use crate::metrics::{Analyzer, EventMetricStore, SampledCollector};
use crate::request::RequestState;
use crate::rng::{shared_rng, SharedRng};
use crate::server::ServerRuntime;
use crate::shared_state::EdgeSpikes;
use crate::live_edge_set::LiveEdgeSet;
use asyncflow_config::{Edge, Scenario};
use asyncflow_channel::{unbounded, MailboxSender};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use tracing::info;

/// Output of a finished run (`spec.md` §6 "Results object"). All queries are
/// delegated to the [`Analyzer`] that was built from the run's collected
/// metrics.
pub struct RunResults {
    analyzer: Analyzer,
}

impl std::ops::Deref for RunResults {
    type Target = Analyzer;

    fn deref(&self) -> &Analyzer {
        &self.analyzer
    }
}

/// Builds and executes one simulation (`spec.md` §4.15).
///
/// The caller is responsible for running inside a `tokio` current-thread
/// runtime with `tokio::time::pause()` already engaged — exactly the
/// environment `#[tokio::test(flavor = "current_thread", start_paused =
/// true)]` provides, and what a standalone binary must set up by hand (see
/// `demos/basic_run.rs`). `Runner::run` itself opens the `LocalSet` its
/// `!Send` actors need.
pub struct Runner {
    scenario: Scenario,
    seed: Option<u64>,
}

impl Runner {
    pub fn new(scenario: Scenario) -> Self {
        Self { scenario, seed: None }
    }

    /// Fixes the run-wide RNG seed for reproducible runs (`spec.md` §5
    /// "Determinism").
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub async fn run(self) -> Result<RunResults, RunError> {
        self.scenario.validate()?;
        let local = tokio::task::LocalSet::new();
        local.run_until(self.run_inner()).await
    }

    async fn run_inner(self) -> Result<RunResults, RunError> {
        let Scenario {
            workload,
            topology,
            settings,
            events,
        } = self.scenario;

        let clock = Clock::start();
        let rng = shared_rng(self.seed);
        let edge_spikes = EdgeSpikes::new();

        let mut senders: HashMap<String, MailboxSender<RequestState>> = HashMap::new();
        let mut receivers = HashMap::new();

        let (tx, rx) = unbounded::<RequestState>();
        senders.insert(topology.client.id.0.clone(), tx);
        receivers.insert(topology.client.id.0.clone(), rx);

        for server in &topology.servers {
            let (tx, rx) = unbounded::<RequestState>();
            senders.insert(server.id.0.clone(), tx);
            receivers.insert(server.id.0.clone(), rx);
        }

        let lb_id = topology.load_balancer.as_ref().map(|lb| lb.id.0.clone());
        if let Some(lb_id) = &lb_id {
            let (tx, rx) = unbounded::<RequestState>();
            senders.insert(lb_id.clone(), tx);
            receivers.insert(lb_id.clone(), rx);
        }

        info!(servers = topology.servers.len(), "building topology");

        // The generator's and every plain node's single outgoing edge.
        let generator_out = build_out_edge(&topology.edges, &workload.id.0, &senders, &rng, clock, &edge_spikes);
        let client_out = build_out_edge(&topology.edges, &topology.client.id.0, &senders, &rng, clock, &edge_spikes);

        let mut servers = Vec::with_capacity(topology.servers.len());
        let mut servers_order = Vec::with_capacity(topology.servers.len());
        let mut server_out_edges = Vec::with_capacity(topology.servers.len());
        for server in &topology.servers {
            let out_edge = build_out_edge(&topology.edges, &server.id.0, &senders, &rng, clock, &edge_spikes)
                .ok_or_else(|| EngineError::Configuration {
                    detail: format!("server `{}` has no outgoing edge", server.id.0),
                })?;
            server_out_edges.push(out_edge.clone());
            let runtime = Rc::new(ServerRuntime::new(
                Rc::from(server.id.0.as_str()),
                server.server_resources.cpu_cores,
                server.server_resources.ram_mb,
                server.endpoints.clone(),
                out_edge,
                rng.clone(),
                clock,
            ));
            servers_order.push(server.id.0.clone());
            servers.push(runtime);
        }

        // The load balancer's live edge set and the injector's reverse index
        // from server id to its covering LB edge (`spec.md` §4.10).
        let live_edges = LiveEdgeSet::new();
        let mut edge_by_server: HashMap<Rc<str>, (Rc<str>, EdgeRuntime)> = HashMap::new();
        let mut lb_edges_for_sampling = Vec::new();
        if let Some(lb_id) = &lb_id {
            for edge in topology.edges.iter().filter(|e| &e.source == lb_id) {
                let target_tx = senders
                    .get(&edge.target)
                    .expect("LB edge target must be a declared node (validated)")
                    .clone();
                let edge_id: Rc<str> = Rc::from(edge.id.0.as_str());
                let runtime = EdgeRuntime::new(
                    edge_id.clone(),
                    target_tx,
                    edge.latency,
                    edge.dropout_rate,
                    rng.clone(),
                    clock,
                    edge_spikes.clone(),
                );
                live_edges.insert(edge_id.clone(), runtime.clone());
                edge_by_server.insert(Rc::from(edge.target.as_str()), (edge_id, runtime.clone()));
                lb_edges_for_sampling.push(runtime);
            }
        }

        // Every edge in the topology feeds `edge_concurrent_connection`
        // (`spec.md` §4.12).
        let mut all_edges = lb_edges_for_sampling;
        if let Some(edge) = &generator_out {
            all_edges.push(edge.clone());
        }
        if let Some(edge) = &client_out {
            all_edges.push(edge.clone());
        }
        all_edges.extend(server_out_edges);

        let completed = EventMetricStore::new();

        let client_rx = receivers.remove(&topology.client.id.0).expect("client mailbox");
        let client = Rc::new(ClientRuntime::new(
            Rc::from(topology.client.id.0.as_str()),
            client_out.expect("client must have exactly one outgoing edge (validated)"),
            completed.clone(),
            clock,
        ));
        tokio::task::spawn_local(client.run(client_rx));

        for (server, server_cfg) in servers.iter().zip(topology.servers.iter()) {
            let rx = receivers
                .remove(&server_cfg.id.0)
                .expect("server mailbox was registered above");
            tokio::task::spawn_local(server.clone().run(rx));
        }

        if let Some(lb) = &topology.load_balancer {
            let rx = receivers.remove(&lb.id.0).expect("lb mailbox");
            let runtime = Rc::new(LoadBalancerRuntime::new(
                Rc::from(lb.id.0.as_str()),
                lb.algorithm,
                live_edges.clone(),
                clock,
            ));
            tokio::task::spawn_local(async move {
                let _ = runtime.run(rx).await;
            });
        }

        let server_ids: HashSet<Rc<str>> = topology
            .servers
            .iter()
            .map(|s| Rc::from(s.id.0.as_str()))
            .collect();
        let injector = Rc::new(EventInjector::new(
            &events,
            &server_ids,
            edge_spikes.clone(),
            edge_by_server,
            live_edges,
            clock,
        ));
        // Started first, ahead of every other actor (`spec.md` §4.15).
        tokio::task::spawn_local(injector.run());

        let collector = SampledCollector::new(
            servers.clone(),
            all_edges,
            settings.enabled_sample_metrics.clone(),
            settings.sample_period_s,
            clock,
        );
        let series = collector.series();
        tokio::task::spawn_local(collector.run());

        if let Some(generator_out) = generator_out {
            let generator = Rc::new(GeneratorRuntime::new(
                Rc::from(workload.id.0.as_str()),
                workload,
                generator_out,
                rng,
                clock,
            ));
            tokio::task::spawn_local(generator.run(settings.total_simulation_time));
        }

        clock.timeout(settings.total_simulation_time).await;

        let analyzer = Analyzer::new(
            completed.snapshot(),
            series,
            servers_order,
            settings.sample_period_s,
        );
        Ok(RunResults { analyzer })
    }
}

/// The outgoing edge of `node_id`, if the topology declares one
/// (`spec.md` §6 "no fan-out except LB" — at most one match expected).
fn build_out_edge(
    edges: &[Edge],
    node_id: &str,
    senders: &HashMap<String, MailboxSender<RequestState>>,
    rng: &SharedRng,
    clock: Clock,
    spikes: &EdgeSpikes,
) -> Option<EdgeRuntime> {
    let edge = edges.iter().find(|e| e.source == node_id)?;
    let target = senders
        .get(&edge.target)
        .expect("edge target must be a declared node (validated)")
        .clone();
    Some(EdgeRuntime::new(
        Rc::from(edge.id.0.as_str()),
        target,
        edge.latency,
        edge.dropout_rate,
        rng.clone(),
        clock,
        spikes.clone(),
    ))
}
