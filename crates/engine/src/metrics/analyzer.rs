//! Post-run analysis (`spec.md` §4.14): lazy, read-only computation over the
//! event and sampled metric stores. Never panics on empty input.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Latency statistics over a run's completed requests
/// (`spec.md` §4.14 `latency_stats()`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LatencyStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub p95: f64,
    pub p99: f64,
    pub min: f64,
    pub max: f64,
}

/// Owns a snapshot of a finished run's metrics and answers the analysis
/// queries `spec.md` §6's Results object requires.
pub struct Analyzer {
    completed_requests: Vec<(f64, f64)>,
    sampled: Rc<RefCell<HashMap<String, HashMap<String, Vec<f64>>>>>,
    servers_order: Vec<String>,
    sample_period_s: f64,
    throughput_cache: RefCell<Option<(f64, Vec<u64>)>>,
}

impl Analyzer {
    pub fn new(
        completed_requests: Vec<(f64, f64)>,
        sampled: Rc<RefCell<HashMap<String, HashMap<String, Vec<f64>>>>>,
        servers_order: Vec<String>,
        sample_period_s: f64,
    ) -> Self {
        Self {
            completed_requests,
            sampled,
            servers_order,
            sample_period_s,
            throughput_cache: RefCell::new(None),
        }
    }

    pub fn completed_requests(&self) -> &[(f64, f64)] {
        &self.completed_requests
    }

    pub fn list_server_ids(&self) -> &[String] {
        &self.servers_order
    }

    /// Exact percentile/moment statistics over `finish - start` latencies.
    /// Returns a zeroed [`LatencyStats`] rather than panicking when no
    /// request completed (`spec.md` §4.14 "never panics on empty input").
    pub fn latency_stats(&self) -> LatencyStats {
        if self.completed_requests.is_empty() {
            return LatencyStats::default();
        }
        let mut latencies: Vec<f64> = self
            .completed_requests
            .iter()
            .map(|(start, finish)| finish - start)
            .collect();
        latencies.sort_by(|a, b| a.partial_cmp(b).expect("latency is never NaN"));

        let count = latencies.len();
        let sum: f64 = latencies.iter().sum();
        let mean = sum / count as f64;
        let variance =
            latencies.iter().map(|l| (l - mean).powi(2)).sum::<f64>() / count as f64;

        LatencyStats {
            count,
            mean,
            median: percentile(&latencies, 0.50),
            std_dev: variance.sqrt(),
            p95: percentile(&latencies, 0.95),
            p99: percentile(&latencies, 0.99),
            min: latencies[0],
            max: latencies[count - 1],
        }
    }

    /// Buckets finish times into `[0, window_s, 2*window_s, ...)`, `window_s`
    /// defaulting to `1.0` s (`spec.md` §4.14). Cached on its window.
    pub fn throughput_series(&self, window_s: Option<f64>) -> Vec<u64> {
        let window_s = window_s.unwrap_or(1.0);
        if let Some((cached_window, series)) = self.throughput_cache.borrow().as_ref() {
            if *cached_window == window_s {
                return series.clone();
            }
        }

        let series = if self.completed_requests.is_empty() {
            Vec::new()
        } else {
            let max_finish = self
                .completed_requests
                .iter()
                .map(|(_, finish)| *finish)
                .fold(0.0_f64, f64::max);
            let bucket_count = (max_finish / window_s).floor() as usize + 1;
            let mut buckets = vec![0u64; bucket_count];
            for (_, finish) in &self.completed_requests {
                let idx = (finish / window_s).floor() as usize;
                buckets[idx.min(bucket_count - 1)] += 1;
            }
            buckets
        };

        *self.throughput_cache.borrow_mut() = Some((window_s, series.clone()));
        series
    }

    /// The full `{metric_key: {entity_id: [values]}}` table
    /// (`spec.md` §6 "Results object" `sampled` field). Index `i` of any
    /// series corresponds to time `i * sample_period_s`.
    pub fn sampled_metrics(&self) -> HashMap<String, HashMap<String, Vec<f64>>> {
        self.sampled.borrow().clone()
    }

    /// A single series, if the metric/entity pair was ever sampled.
    pub fn get_series(&self, metric: &str, entity_id: &str) -> Option<Vec<f64>> {
        self.sampled
            .borrow()
            .get(metric)
            .and_then(|entities| entities.get(entity_id))
            .cloned()
    }

    pub fn sample_period_s(&self) -> f64 {
        self.sample_period_s
    }

    /// Forces every lazily-cached computation to run once, the way
    /// `spec.md` §6's `process_all_metrics()` is described: a convenience
    /// for callers who want to pay the analysis cost up front.
    pub fn process_all_metrics(&self) {
        let _ = self.latency_stats();
        let _ = self.throughput_series(None);
        let _ = self.sampled_metrics();
    }
}

/// Exact percentile from a pre-sorted slice via nearest-rank.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = (p * (sorted.len() - 1) as f64).round() as usize;
    sorted[rank.min(sorted.len() - 1)]
}
