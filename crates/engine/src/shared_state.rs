//! Single-writer, many-reader state shared between the event injector and
//! the edges/load balancer it observes (`spec.md` §4.10, §9 "Shared-but-
//! unlocked maps").
//!
//! Because the scheduler is single-threaded, interior mutability without a
//! lock is sound as long as only the event injector ever writes: that
//! discipline is enforced here simply by never exposing a mutation method
//! on [`EdgeSpikes`] outside this crate's injector module.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// Cumulative additive latency spike per edge (`spec.md` §4.10
/// `edges_spike`). `spec.md` also tracks a separate `edges_affected` set,
/// but since an edge with no active spike simply reads back `0.0` from this
/// map, the set collapses into a default-zero lookup here — one fewer
/// collection to keep in sync, same observable behavior.
#[derive(Clone, Default)]
pub struct EdgeSpikes {
    inner: Rc<RefCell<HashMap<Rc<str>, f64>>>,
}

impl EdgeSpikes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read by an edge at delivery-scheduling time (`spec.md` §4.7 step 4).
    pub fn current_spike(&self, edge_id: &str) -> f64 {
        self.inner.borrow().get(edge_id).copied().unwrap_or(0.0)
    }

    /// Written only by the event injector.
    pub(crate) fn add(&self, edge_id: &Rc<str>, delta: f64) {
        let mut map = self.inner.borrow_mut();
        *map.entry(edge_id.clone()).or_insert(0.0) += delta;
    }
}

/// A per-edge in-flight delivery counter (`spec.md` §3 "Per-edge concurrency
/// counter"), mutated only by the owning `EdgeRuntime`'s delivery tasks.
#[derive(Clone, Default)]
pub struct ConcurrencyCounter {
    inner: Rc<Cell<u32>>,
}

impl ConcurrencyCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> u32 {
        self.inner.get()
    }

    pub fn inc(&self) {
        self.inner.set(self.inner.get() + 1);
    }

    pub fn dec(&self) {
        self.inner.set(self.inner.get() - 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_spikes_add_and_then_unwind() {
        let spikes = EdgeSpikes::new();
        let edge: Rc<str> = Rc::from("e1");
        assert_eq!(spikes.current_spike(&edge), 0.0);

        spikes.add(&edge, 0.005);
        assert_eq!(spikes.current_spike(&edge), 0.005);

        spikes.add(&edge, 0.010);
        assert_eq!(spikes.current_spike(&edge), 0.015);

        spikes.add(&edge, -0.005);
        assert_eq!(spikes.current_spike(&edge), 0.010);

        spikes.add(&edge, -0.010);
        assert_eq!(spikes.current_spike(&edge), 0.0);
    }

    #[test]
    fn counter_tracks_concurrent_connections() {
        let counter = ConcurrencyCounter::new();
        assert_eq!(counter.get(), 0);
        counter.inc();
        counter.inc();
        assert_eq!(counter.get(), 2);
        counter.dec();
        assert_eq!(counter.get(), 1);
    }
}
