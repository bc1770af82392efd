//! The sampled metric collector (`spec.md` §4.12): a single coroutine that
//! ticks every `sample_period_s` and snapshots queue/RAM/connection depths.

use crate::clock::Clock;
use crate::edge::EdgeRuntime;
use crate::server::ServerRuntime;
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;
use tracing::trace;

const READY_QUEUE_LEN: &str = "ready_queue_len";
const EVENT_LOOP_IO_SLEEP: &str = "event_loop_io_sleep";
const RAM_IN_USE: &str = "ram_in_use";
const EDGE_CONCURRENT_CONNECTION: &str = "edge_concurrent_connection";

type SeriesMap = HashMap<String, HashMap<String, Vec<f64>>>;

/// Owns the `{metric_key: {entity_id: [values]}}` table the analyzer reads
/// after the run (`spec.md` §6 "Results object" `sampled` field). Shared
/// between the collector (sole writer) and the `Runner`/`Analyzer` (readers
/// after the run completes).
pub struct SampledCollector {
    series: Rc<RefCell<SeriesMap>>,
    servers: Rc<Vec<Rc<ServerRuntime>>>,
    edges: Rc<Vec<EdgeRuntime>>,
    enabled: Rc<BTreeSet<String>>,
    sample_period_s: f64,
    clock: Clock,
}

impl SampledCollector {
    pub fn new(
        servers: Vec<Rc<ServerRuntime>>,
        edges: Vec<EdgeRuntime>,
        enabled: BTreeSet<String>,
        sample_period_s: f64,
        clock: Clock,
    ) -> Self {
        Self {
            series: Rc::new(RefCell::new(HashMap::new())),
            servers: Rc::new(servers),
            edges: Rc::new(edges),
            enabled: Rc::new(enabled),
            sample_period_s,
            clock,
        }
    }

    /// A read handle into the series table, usable once the run has
    /// finished (the writer has no outstanding borrows across `.await`).
    pub fn series(&self) -> Rc<RefCell<SeriesMap>> {
        self.series.clone()
    }

    fn append(&self, metric: &str, entity: &str, value: f64) {
        if !self.enabled.contains(metric) {
            return;
        }
        self.series
            .borrow_mut()
            .entry(metric.to_string())
            .or_default()
            .entry(entity.to_string())
            .or_default()
            .push(value);
    }

    /// Runs until the clock's driving `run_until` timeout cancels the task
    /// (`spec.md` §4.12).
    pub async fn run(self) {
        loop {
            self.clock.timeout(self.sample_period_s).await;
            for server in self.servers.iter() {
                self.append(READY_QUEUE_LEN, server.id(), server.ready_queue_len() as f64);
                self.append(
                    EVENT_LOOP_IO_SLEEP,
                    server.id(),
                    server.io_queue_len() as f64,
                );
                self.append(RAM_IN_USE, server.id(), server.ram_in_use() as f64);
            }
            for edge in self.edges.iter() {
                self.append(
                    EDGE_CONCURRENT_CONNECTION,
                    edge.id(),
                    edge.concurrent_connections() as f64,
                );
            }
            trace!(t = self.clock.now(), "sampled tick");
        }
    }
}
