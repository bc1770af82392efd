//! Load balancer runtime (`spec.md` §4.9).

use crate::clock::Clock;
use crate::error::EngineError;
use crate::live_edge_set::LiveEdgeSet;
use crate::request::{ComponentKind, RequestState};
use asyncflow_channel::MailboxReceiver;
use asyncflow_config::LbAlgorithm;
use std::cell::Cell;
use std::rc::Rc;
use tracing::trace;

/// Reads the live edge set and picks an outgoing edge; never mutates it
/// (`spec.md` §4.9: "The LB must never mutate the live edge set").
pub struct LoadBalancerRuntime {
    id: Rc<str>,
    algorithm: LbAlgorithm,
    live_edges: LiveEdgeSet,
    rr_index: Cell<usize>,
    clock: Clock,
}

impl LoadBalancerRuntime {
    pub fn new(id: Rc<str>, algorithm: LbAlgorithm, live_edges: LiveEdgeSet, clock: Clock) -> Self {
        Self {
            id,
            algorithm,
            live_edges,
            rr_index: Cell::new(0),
            clock,
        }
    }

    pub async fn run(self: Rc<Self>, inbox: MailboxReceiver<RequestState>) -> Result<(), EngineError> {
        loop {
            let mut state = match inbox.get().await {
                Ok(state) => state,
                Err(_) => return Ok(()),
            };
            let now = self.clock.now();
            state.record_hop(ComponentKind::LoadBalancer, self.id.clone(), now);

            let edge = self.pick()?;
            trace!(lb = %self.id, request = state.id, "routed");
            edge.transport(state);
        }
    }

    fn pick(&self) -> Result<crate::edge::EdgeRuntime, EngineError> {
        if self.live_edges.is_empty() {
            // The schema-level precondition (`spec.md` §4.10: "globally, not
            // all servers may be simultaneously down") rules this out for a
            // validated scenario; if it happens anyway it is a fatal
            // configuration error (`spec.md` §7 kind 2), not something to
            // silently stall on.
            return Err(EngineError::Configuration {
                detail: format!("load balancer `{}` has no live outgoing edge", self.id),
            });
        }
        match self.algorithm {
            LbAlgorithm::RoundRobin => {
                let i = self.rr_index.get();
                let edge = self.live_edges.at(i).expect("checked non-empty above");
                self.rr_index.set(i + 1);
                Ok(edge)
            }
            LbAlgorithm::LeastConnection => Ok(self
                .live_edges
                .least_connections()
                .expect("checked non-empty above")),
        }
    }
}
