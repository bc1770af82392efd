//! Edge delivery (`spec.md` §4.7).

use crate::clock::Clock;
use crate::request::{ComponentKind, RequestState};
use crate::rng::SharedRng;
use crate::shared_state::{EdgeSpikes, ConcurrencyCounter};
use asyncflow_channel::MailboxSender;
use asyncflow_config::RVConfig;
use std::rc::Rc;
use tracing::trace;

struct EdgeInner {
    id: Rc<str>,
    target: MailboxSender<RequestState>,
    latency: RVConfig,
    dropout_rate: f64,
    concurrency: ConcurrencyCounter,
    rng: SharedRng,
    clock: Clock,
    spikes: EdgeSpikes,
}

/// A directed network link (`spec.md` §3 "Edge"). Cheaply `Clone`-able — all
/// clones share the same concurrency counter and target mailbox.
#[derive(Clone)]
pub struct EdgeRuntime {
    inner: Rc<EdgeInner>,
}

impl EdgeRuntime {
    pub fn new(
        id: Rc<str>,
        target: MailboxSender<RequestState>,
        latency: RVConfig,
        dropout_rate: f64,
        rng: SharedRng,
        clock: Clock,
        spikes: EdgeSpikes,
    ) -> Self {
        Self {
            inner: Rc::new(EdgeInner {
                id,
                target,
                latency,
                dropout_rate,
                concurrency: ConcurrencyCounter::new(),
                rng,
                clock,
                spikes,
            }),
        }
    }

    pub fn id(&self) -> &Rc<str> {
        &self.inner.id
    }

    /// Number of in-flight deliveries on this edge — read by
    /// `LeastConnections` and the sampled metric collector (`spec.md` §4.9,
    /// §4.12).
    pub fn concurrent_connections(&self) -> u32 {
        self.inner.concurrency.get()
    }

    /// Non-blocking for the caller: spawns a fire-and-forget delivery task
    /// bound to `state` (`spec.md` §4.7 "transport(state) contract").
    pub fn transport(&self, state: RequestState) {
        let edge = self.clone();
        let _handle = tokio::task::spawn_local(async move { edge.deliver(state).await });
    }

    async fn deliver(&self, mut state: RequestState) {
        let inner = &self.inner;
        inner.concurrency.inc();

        let d = inner.rng.borrow_mut().uniform();
        if d < inner.dropout_rate {
            state.finish(inner.clock.now());
            trace!(edge = %inner.id, request = state.id, "dropped");
            inner.concurrency.dec();
            return;
        }

        let base_latency = inner.rng.borrow_mut().sample_rv(&inner.latency);
        let effective = base_latency + inner.spikes.current_spike(&inner.id);

        inner.clock.timeout(effective).await;

        let now = inner.clock.now();
        state.record_hop(ComponentKind::Edge, inner.id.clone(), now);
        let _ = inner.target.put(state).await;
        inner.concurrency.dec();
    }
}
