//! Workload generator (`spec.md` §4.6): the hierarchical Poisson/Normal →
//! Poisson sampler that produces inter-arrival gaps and injects fresh
//! requests into the topology.

use crate::clock::Clock;
use crate::edge::EdgeRuntime;
use crate::request::RequestState;
use crate::rng::SharedRng;
use asyncflow_config::RqsGenerator;
use std::cell::Cell;
use std::rc::Rc;
use tracing::trace;

pub struct GeneratorRuntime {
    id: Rc<str>,
    config: RqsGenerator,
    out_edge: EdgeRuntime,
    rng: SharedRng,
    clock: Clock,
    next_request_id: Cell<u64>,
}

impl GeneratorRuntime {
    pub fn new(id: Rc<str>, config: RqsGenerator, out_edge: EdgeRuntime, rng: SharedRng, clock: Clock) -> Self {
        Self {
            id,
            config,
            out_edge,
            rng,
            clock,
            next_request_id: Cell::new(0),
        }
    }

    /// Runs the hierarchical sampler to completion (`spec.md` §4.6). Exits
    /// once no further arrival can occur before `total_simulation_time`.
    pub async fn run(self: Rc<Self>, total_simulation_time: f64) {
        let rpm_mean = self.config.avg_request_per_minute_per_user.mean;

        let mut t = 0.0_f64;
        let mut window_end = 0.0_f64;
        let mut lambda = 0.0_f64;

        while t < total_simulation_time {
            if t >= window_end {
                window_end = t + self.config.user_sampling_window as f64;
                let u = self.rng.borrow_mut().sample_rv(&self.config.avg_active_users);
                lambda = u * (rpm_mean / 60.0);
            }

            if lambda <= 0.0 {
                let dt = window_end - t;
                self.clock.timeout(dt).await;
                t = window_end;
                continue;
            }

            let u = self.rng.borrow_mut().uniform();
            let delta = -(1.0 - u).ln() / lambda;

            if t + delta > total_simulation_time {
                break;
            }
            if t + delta >= window_end {
                let dt = window_end - t;
                self.clock.timeout(dt).await;
                t = window_end;
                continue;
            }

            self.clock.timeout(delta).await;
            t += delta;

            let id = self.next_request_id.get();
            self.next_request_id.set(id + 1);
            let state = RequestState::new(id, self.clock.now(), self.id.clone());
            trace!(generator = %self.id, request = id, "emitted");
            self.out_edge.transport(state);
        }
    }
}

