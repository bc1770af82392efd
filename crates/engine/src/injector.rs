//! The event injector (`spec.md` §4.10): the single process that owns both
//! the edge-spike timeline and the server up/down timeline, and is the only
//! writer of [`crate::shared_state::EdgeSpikes`] and the load balancer's
//! live edge set.

use crate::clock::Clock;
use crate::edge::EdgeRuntime;
use crate::live_edge_set::LiveEdgeSet;
use crate::shared_state::EdgeSpikes;
use asyncflow_config::EventInjection;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use tracing::trace;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Start,
    End,
}

impl Mark {
    /// End precedes Start at equal `t` (`spec.md` §4.10 "Ordering").
    fn rank(self) -> u8 {
        match self {
            Mark::End => 0,
            Mark::Start => 1,
        }
    }
}

struct EdgeTimelineEntry {
    t: f64,
    event_id: Rc<str>,
    edge_id: Rc<str>,
    mark: Mark,
    spike_s: f64,
}

struct ServerTimelineEntry {
    t: f64,
    event_id: Rc<str>,
    server_id: Rc<str>,
    mark: Mark,
}

/// Owns both timelines derived from the scenario's `events` list and drives
/// the two independent coroutines (`spec.md` §4.10 "Edges process",
/// "Servers process").
pub struct EventInjector {
    edges_timeline: Vec<EdgeTimelineEntry>,
    servers_timeline: Vec<ServerTimelineEntry>,
    edges_spike: EdgeSpikes,
    edge_by_server: HashMap<Rc<str>, (Rc<str>, EdgeRuntime)>,
    lb_out_edges: LiveEdgeSet,
    clock: Clock,
}

impl EventInjector {
    /// `server_ids` distinguishes a server-outage event from a network-spike
    /// event by target membership (`asyncflow_config::EventInjection` does
    /// not carry a separate kind field — see its doc comment).
    pub fn new(
        events: &[EventInjection],
        server_ids: &HashSet<Rc<str>>,
        edges_spike: EdgeSpikes,
        edge_by_server: HashMap<Rc<str>, (Rc<str>, EdgeRuntime)>,
        lb_out_edges: LiveEdgeSet,
        clock: Clock,
    ) -> Self {
        let mut edges_timeline = Vec::new();
        let mut servers_timeline = Vec::new();

        for event in events {
            let event_id: Rc<str> = Rc::from(event.event_id.0.as_str());
            let target_id: Rc<str> = Rc::from(event.target_id.as_str());

            if server_ids.contains(&target_id) {
                servers_timeline.push(ServerTimelineEntry {
                    t: event.start,
                    event_id: event_id.clone(),
                    server_id: target_id.clone(),
                    mark: Mark::Start,
                });
                servers_timeline.push(ServerTimelineEntry {
                    t: event.end,
                    event_id,
                    server_id: target_id,
                    mark: Mark::End,
                });
            } else {
                let spike_s = event.spike_s.unwrap_or(0.0);
                edges_timeline.push(EdgeTimelineEntry {
                    t: event.start,
                    event_id: event_id.clone(),
                    edge_id: target_id.clone(),
                    mark: Mark::Start,
                    spike_s,
                });
                edges_timeline.push(EdgeTimelineEntry {
                    t: event.end,
                    event_id,
                    edge_id: target_id,
                    mark: Mark::End,
                    spike_s,
                });
            }
        }

        edges_timeline.sort_by(|a, b| {
            a.t.partial_cmp(&b.t)
                .expect("event times are never NaN")
                .then(a.mark.rank().cmp(&b.mark.rank()))
                .then(a.event_id.cmp(&b.event_id))
                .then(a.edge_id.cmp(&b.edge_id))
        });
        servers_timeline.sort_by(|a, b| {
            a.t.partial_cmp(&b.t)
                .expect("event times are never NaN")
                .then(a.mark.rank().cmp(&b.mark.rank()))
                .then(a.event_id.cmp(&b.event_id))
                .then(a.server_id.cmp(&b.server_id))
        });

        Self {
            edges_timeline,
            servers_timeline,
            edges_spike,
            edge_by_server,
            lb_out_edges,
            clock,
        }
    }

    /// Drives both timelines concurrently until each is exhausted
    /// (`spec.md` §4.10, §4.15 "start the injector first").
    pub async fn run(self: Rc<Self>) {
        let edges = self.clone();
        let servers = self.clone();
        tokio::join!(edges.run_edges(), servers.run_servers());
    }

    async fn run_edges(self: Rc<Self>) {
        let mut last_t = 0.0_f64;
        for entry in &self.edges_timeline {
            self.clock.timeout(entry.t - last_t).await;
            last_t = entry.t;
            match entry.mark {
                Mark::Start => self.edges_spike.add(&entry.edge_id, entry.spike_s),
                Mark::End => self.edges_spike.add(&entry.edge_id, -entry.spike_s),
            }
            trace!(event = %entry.event_id, edge = %entry.edge_id, "edge spike transition");
        }
    }

    async fn run_servers(self: Rc<Self>) {
        let mut last_t = 0.0_f64;
        for entry in &self.servers_timeline {
            self.clock.timeout(entry.t - last_t).await;
            last_t = entry.t;
            match entry.mark {
                Mark::Start => {
                    if let Some((edge_id, _)) = self.edge_by_server.get(&entry.server_id) {
                        self.lb_out_edges.remove(edge_id);
                    }
                }
                Mark::End => {
                    if let Some((edge_id, handle)) = self.edge_by_server.get(&entry.server_id) {
                        // Re-insertion always appends at the end of the
                        // ordered map, matching `move_to_end` — fair
                        // round-robin re-entry (`spec.md` §4.10).
                        self.lb_out_edges.insert(edge_id.clone(), handle.clone());
                    }
                }
            }
            trace!(event = %entry.event_id, server = %entry.server_id, "server transition");
        }
    }
}
