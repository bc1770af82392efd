//! Full graph/field validation for a [`crate::scenario::Scenario`]
//! (`spec.md` §6 "Graph validation", §4.6, §4.10).

use crate::error::{ValidationError, ValidationErrors};
use crate::rv::Distribution;
use crate::scenario::Scenario;
use crate::settings::{MANDATORY_EVENT_METRICS, MANDATORY_SAMPLE_METRICS};
use std::collections::{HashMap, HashSet};

impl Scenario {
    /// Runs every validation rule and returns all violations found, or `Ok`
    /// if none. Never panics and never short-circuits on the first error.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();

        self.validate_workload(&mut errors);
        self.validate_settings(&mut errors);
        self.validate_servers(&mut errors);
        self.validate_topology(&mut errors);
        self.validate_events(&mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors { errors })
        }
    }

    fn validate_workload(&self, errors: &mut Vec<ValidationError>) {
        let w = &self.workload;
        if w.avg_request_per_minute_per_user.distribution != Distribution::Poisson {
            errors.push(ValidationError::RpmNotPoisson);
        }
        if !matches!(
            w.avg_active_users.distribution,
            Distribution::Poisson | Distribution::Normal
        ) {
            errors.push(ValidationError::ActiveUsersBadDistribution);
        }
        if !(1..=120).contains(&w.user_sampling_window) {
            errors.push(ValidationError::SamplingWindowOutOfRange(
                w.user_sampling_window,
            ));
        }
    }

    fn validate_settings(&self, errors: &mut Vec<ValidationError>) {
        let s = &self.settings;
        if s.total_simulation_time < 5.0 {
            errors.push(ValidationError::TotalSimulationTimeTooSmall(
                s.total_simulation_time,
            ));
        }
        if !(0.001..=0.1).contains(&s.sample_period_s) {
            errors.push(ValidationError::SamplePeriodOutOfRange(s.sample_period_s));
        }
        for m in MANDATORY_SAMPLE_METRICS {
            if !s.enabled_sample_metrics.contains(*m) {
                errors.push(ValidationError::MissingMandatorySampleMetric(
                    (*m).to_string(),
                ));
            }
        }
        for m in MANDATORY_EVENT_METRICS {
            if !s.enabled_event_metrics.contains(*m) {
                errors.push(ValidationError::MissingMandatoryEventMetric(
                    (*m).to_string(),
                ));
            }
        }
    }

    fn validate_servers(&self, errors: &mut Vec<ValidationError>) {
        for server in &self.topology.servers {
            if server.server_resources.cpu_cores < 1 {
                errors.push(ValidationError::ServerNoCpuCores(server.id.to_string()));
            }
            if server.server_resources.ram_mb < 256 {
                errors.push(ValidationError::ServerRamTooSmall(server.id.to_string()));
            }
            for endpoint in &server.endpoints {
                for step in &endpoint.steps {
                    match step {
                        crate::step::Step::Cpu { time_s, .. } | crate::step::Step::Io { time_s, .. }
                            if *time_s <= 0.0 =>
                        {
                            errors.push(ValidationError::StepNonPositiveTime {
                                server: server.id.to_string(),
                                endpoint: endpoint.name.clone(),
                            });
                        }
                        crate::step::Step::Ram { mb } if *mb == 0 => {
                            errors.push(ValidationError::StepZeroRam {
                                server: server.id.to_string(),
                                endpoint: endpoint.name.clone(),
                            });
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    /// Validates the topology graph: duplicate/dangling ids, self-loops,
    /// illegal fan-out, and load-balancer coverage.
    fn validate_topology(&self, errors: &mut Vec<ValidationError>) {
        let topo = &self.topology;
        let mut node_ids: HashSet<String> = HashSet::new();
        let mut seen_servers: HashSet<String> = HashSet::new();

        for server in &topo.servers {
            if !seen_servers.insert(server.id.0.clone()) {
                errors.push(ValidationError::DuplicateServerId(server.id.0.clone()));
            }
            node_ids.insert(server.id.0.clone());
        }
        node_ids.insert(topo.client.id.0.clone());
        if let Some(lb) = &topo.load_balancer {
            node_ids.insert(lb.id.0.clone());
        }

        let mut seen_edges: HashSet<String> = HashSet::new();
        let mut out_degree: HashMap<String, usize> = HashMap::new();
        for edge in &topo.edges {
            if !seen_edges.insert(edge.id.0.clone()) {
                errors.push(ValidationError::DuplicateEdgeId(edge.id.0.clone()));
            }
            if edge.source == edge.target {
                errors.push(ValidationError::SelfLoop {
                    edge: edge.id.0.clone(),
                    node: edge.source.clone(),
                });
            }
            if !node_ids.contains(&edge.target) {
                if edge.target == self.workload.id.0 {
                    errors.push(ValidationError::GeneratorAsTarget {
                        edge: edge.id.0.clone(),
                    });
                } else {
                    errors.push(ValidationError::DanglingEdgeTarget {
                        edge: edge.id.0.clone(),
                        target: edge.target.clone(),
                    });
                }
            }
            if edge.latency.mean <= 0.0 {
                errors.push(ValidationError::EdgeLatencyMeanNotPositive(
                    edge.id.0.clone(),
                ));
            }
            if let Some(var) = edge.latency.variance {
                if var < 0.0 {
                    errors.push(ValidationError::EdgeLatencyVarianceNegative(
                        edge.id.0.clone(),
                    ));
                }
            }
            if !(0.0..=1.0).contains(&edge.dropout_rate) {
                errors.push(ValidationError::EdgeDropoutOutOfRange(edge.id.0.clone()));
            }
            *out_degree.entry(edge.source.clone()).or_insert(0) += 1;
        }

        let lb_node_id = topo.load_balancer.as_ref().map(|lb| lb.id.0.clone());
        for (node, count) in &out_degree {
            if *count > 1 && Some(node) != lb_node_id.as_ref() {
                errors.push(ValidationError::IllegalFanOut {
                    node: node.clone(),
                    count: *count,
                });
            }
        }

        for server in &topo.servers {
            if out_degree.get(&server.id.0).copied().unwrap_or(0) == 0 {
                errors.push(ValidationError::ServerMissingOutgoingEdge(
                    server.id.0.clone(),
                ));
            }
        }

        if let Some(lb) = &topo.load_balancer {
            let covered_edges: HashSet<&String> = topo
                .edges
                .iter()
                .filter(|e| e.source == lb.id.0)
                .map(|e| &e.target)
                .collect();
            for server in &lb.server_covered {
                if !seen_servers.contains(&server.0) {
                    errors.push(ValidationError::LbCoversUnknownServer {
                        lb: lb.id.0.clone(),
                        server: server.0.clone(),
                    });
                } else if !covered_edges.contains(&server.0) {
                    errors.push(ValidationError::LbMissingCoverageEdge {
                        lb: lb.id.0.clone(),
                        server: server.0.clone(),
                    });
                }
            }
        }
    }

    fn validate_events(&self, errors: &mut Vec<ValidationError>) {
        let server_ids: HashSet<&str> = self
            .topology
            .servers
            .iter()
            .map(|s| s.id.0.as_str())
            .collect();
        let edge_ids: HashSet<&str> = self.topology.edges.iter().map(|e| e.id.0.as_str()).collect();

        let mut seen_events: HashSet<String> = HashSet::new();
        let mut server_down_windows: HashMap<String, Vec<(f64, f64)>> = HashMap::new();

        for event in &self.events {
            if !seen_events.insert(event.event_id.0.clone()) {
                errors.push(ValidationError::DuplicateEventId(event.event_id.0.clone()));
            }

            let targets_server = server_ids.contains(event.target_id.as_str());
            let targets_edge = edge_ids.contains(event.target_id.as_str());
            if !targets_server && !targets_edge {
                errors.push(ValidationError::EventDanglingTarget {
                    event: event.event_id.0.clone(),
                    target: event.target_id.clone(),
                });
                continue;
            }

            if event.start >= event.end {
                errors.push(ValidationError::EventBadWindow {
                    event: event.event_id.0.clone(),
                    start: event.start,
                    end: event.end,
                });
            }
            if event.start < 0.0
                || event.start > self.settings.total_simulation_time
                || event.end > self.settings.total_simulation_time
            {
                errors.push(ValidationError::EventWindowOutOfBounds {
                    event: event.event_id.0.clone(),
                });
            }
            if targets_edge {
                match event.spike_s {
                    Some(s) if s > 0.0 => {}
                    _ => errors.push(ValidationError::EventMissingSpike {
                        event: event.event_id.0.clone(),
                    }),
                }
            }
            if targets_server && event.start < event.end {
                server_down_windows
                    .entry(event.target_id.clone())
                    .or_default()
                    .push((event.start, event.end));
            }
        }

        if !server_ids.is_empty() {
            if let Some(at) = find_all_servers_down_instant(&server_ids, &server_down_windows) {
                errors.push(ValidationError::AllServersDownAt { at });
            }
        }
    }
}

/// Sweeps the server-down windows for an instant at which every declared
/// server is simultaneously down (`spec.md` §4.10 precondition).
///
/// Tracks a per-server down-depth rather than a down/up set so that two
/// overlapping windows on the same server (e.g. `[1,5]` and `[3,8]`) don't
/// make that server look "up" again at `t=5` while the second window is
/// still active.
fn find_all_servers_down_instant(
    server_ids: &HashSet<&str>,
    windows: &HashMap<String, Vec<(f64, f64)>>,
) -> Option<f64> {
    let mut boundaries: Vec<(f64, i32, String)> = Vec::new();
    for (server, spans) in windows {
        for (start, end) in spans {
            boundaries.push((*start, 1, server.clone()));
            boundaries.push((*end, -1, server.clone()));
        }
    }
    // End-before-start at equal t, matching the injector ordering rule.
    boundaries.sort_by(|a, b| {
        a.0.partial_cmp(&b.0)
            .unwrap()
            .then(a.1.cmp(&b.1))
    });

    let mut depth: HashMap<&str, i32> = HashMap::new();
    let mut down_count = 0usize;
    for (t, delta, server) in &boundaries {
        let d = depth.entry(server.as_str()).or_insert(0);
        let was_down = *d > 0;
        *d += delta;
        let is_down = *d > 0;
        if is_down && !was_down {
            down_count += 1;
        } else if was_down && !is_down {
            down_count -= 1;
        }
        if down_count == server_ids.len() {
            return Some(*t);
        }
    }
    None
}
