//! The event metric store (`spec.md` §4.13): `rqs_clock`, the
//! `(start, finish)` pair recorded by the terminal client for every
//! completed request.

use std::cell::RefCell;
use std::rc::Rc;

/// Shared sink for completed-request timings. Cloning shares the same
/// backing store — every `ClientRuntime` writes into the one the `Runner`
/// hands it.
#[derive(Clone, Default)]
pub struct EventMetricStore {
    inner: Rc<RefCell<Vec<(f64, f64)>>>,
}

impl EventMetricStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one completed request's `(initial_time, finish_time)` pair.
    pub fn record(&self, start: f64, finish: f64) {
        self.inner.borrow_mut().push((start, finish));
    }

    /// A snapshot of everything recorded so far, consumed by the analyzer
    /// after the run (`spec.md` §4.14).
    pub fn snapshot(&self) -> Vec<(f64, f64)> {
        self.inner.borrow().clone()
    }
}
