//! Client runtime (`spec.md` §4.11).

use crate::clock::Clock;
use crate::edge::EdgeRuntime;
use crate::metrics::event_store::EventMetricStore;
use crate::request::{ComponentKind, RequestState};
use asyncflow_channel::MailboxReceiver;
use std::rc::Rc;
use tracing::trace;

/// A request is terminal at the client iff its most recent node hop before
/// this one is not at the generator (`spec.md` §4.11, §9 "fragile client
/// terminal rule"). The rule itself is kept verbatim per the design note;
/// what changed is that it's evaluated against node hops only, since every
/// node-to-node trip records an edge hop in between and the rule as stated
/// in `spec.md` means "the node before the edge we just arrived from", not
/// literally `history[-2]`.
pub struct ClientRuntime {
    id: Rc<str>,
    out_edge: EdgeRuntime,
    completed: EventMetricStore,
    clock: Clock,
}

impl ClientRuntime {
    pub fn new(id: Rc<str>, out_edge: EdgeRuntime, completed: EventMetricStore, clock: Clock) -> Self {
        Self {
            id,
            out_edge,
            completed,
            clock,
        }
    }

    pub async fn run(self: Rc<Self>, inbox: MailboxReceiver<RequestState>) {
        loop {
            let mut state = match inbox.get().await {
                Ok(state) => state,
                Err(_) => break,
            };
            let now = self.clock.now();
            state.record_hop(ComponentKind::Client, self.id.clone(), now);

            let came_from_generator = state
                .previous_node_hop()
                .map(|hop| hop.kind == ComponentKind::Generator)
                .unwrap_or(false);

            if !came_from_generator {
                state.finish(now);
                trace!(client = %self.id, request = state.id, "completed");
                self.completed.record(state.initial_time, now);
            } else {
                self.out_edge.transport(state);
            }
        }
    }
}
