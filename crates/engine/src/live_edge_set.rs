//! The load balancer's live edge set (`spec.md` §3 "Live edge set for a
//! load balancer", §4.10).
//!
//! An ordered `edge_id -> EdgeRuntime` map backed by `indexmap::IndexMap`:
//! iteration order is insertion order, `shift_remove` drops an entry while
//! keeping the rest in place, and inserting a fresh key always appends at
//! the end — which is exactly the "remove, then reinsert" rejoin sequence
//! `spec.md` §4.10 calls `move_to_end`. `shift_remove` is O(n) in the
//! number of live entries rather than the spec's idealized O(1); for the
//! server counts this engine targets (tens, not millions) that trade is the
//! idiomatic choice over hand-rolling a doubly-linked hash map.
//!
//! Shared by reference between the event injector (sole writer) and the
//! load balancer (sole reader) — never copied (`spec.md` §3).

use crate::edge::EdgeRuntime;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Default)]
pub struct LiveEdgeSet {
    inner: Rc<RefCell<IndexMap<Rc<str>, EdgeRuntime>>>,
}

impl LiveEdgeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, edge_id: Rc<str>, edge: EdgeRuntime) {
        self.inner.borrow_mut().insert(edge_id, edge);
    }

    pub fn remove(&self, edge_id: &str) -> Option<EdgeRuntime> {
        self.inner.borrow_mut().shift_remove(edge_id)
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entry at `index % len`, used by round-robin selection.
    pub fn at(&self, index: usize) -> Option<EdgeRuntime> {
        let inner = self.inner.borrow();
        if inner.is_empty() {
            return None;
        }
        inner.get_index(index % inner.len()).map(|(_, v)| v.clone())
    }

    /// The entry with the fewest concurrent connections, ties broken by
    /// insertion order (`spec.md` §4.9 "LeastConnections").
    pub fn least_connections(&self) -> Option<EdgeRuntime> {
        self.inner
            .borrow()
            .values()
            .min_by_key(|e| e.concurrent_connections())
            .cloned()
    }
}
