//! Server dispatcher and per-request handler (`spec.md` §4.8).

use crate::clock::Clock;
use crate::edge::EdgeRuntime;
use crate::request::{ComponentKind, RequestState};
use crate::resource::FifoResource;
use crate::rng::SharedRng;
use asyncflow_channel::MailboxReceiver;
use asyncflow_config::{Endpoint, Step};
use std::cell::Cell;
use std::rc::Rc;
use tracing::trace;

/// A server's CPU/RAM resources and endpoint table
/// (`spec.md` §3 "Server").
pub struct ServerRuntime {
    id: Rc<str>,
    cpu: FifoResource,
    ram: FifoResource,
    io_queue_len: Rc<Cell<u32>>,
    endpoints: Rc<Vec<Endpoint>>,
    out_edge: EdgeRuntime,
    rng: SharedRng,
    clock: Clock,
}

impl ServerRuntime {
    pub fn new(
        id: Rc<str>,
        cpu_cores: u32,
        ram_mb: u32,
        endpoints: Vec<Endpoint>,
        out_edge: EdgeRuntime,
        rng: SharedRng,
        clock: Clock,
    ) -> Self {
        Self {
            id,
            cpu: FifoResource::new(cpu_cores),
            ram: FifoResource::new(ram_mb),
            io_queue_len: Rc::new(Cell::new(0)),
            endpoints: Rc::new(endpoints),
            out_edge,
            rng,
            clock,
        }
    }

    pub fn id(&self) -> &Rc<str> {
        &self.id
    }

    pub fn ready_queue_len(&self) -> u32 {
        self.cpu.capacity() - self.cpu.available()
    }

    pub fn io_queue_len(&self) -> u32 {
        self.io_queue_len.get()
    }

    pub fn ram_in_use(&self) -> u32 {
        self.ram.capacity() - self.ram.available()
    }

    /// Dispatcher loop: pulls a request and spawns a fire-and-forget
    /// handler for it (`spec.md` §4.8).
    pub async fn run(self: Rc<Self>, inbox: MailboxReceiver<RequestState>) {
        loop {
            let state = match inbox.get().await {
                Ok(state) => state,
                Err(_) => break,
            };
            let server = self.clone();
            let _handle = tokio::task::spawn_local(async move { server.handle(state).await });
        }
    }

    async fn handle(&self, mut state: RequestState) {
        let now = self.clock.now();
        state.record_hop(ComponentKind::Server, self.id.clone(), now);

        let endpoint_idx = {
            let mut rng = self.rng.borrow_mut();
            rng.uniform_in_range(0.0, self.endpoints.len() as f64) as usize
        }
        .min(self.endpoints.len() - 1);
        let endpoint = &self.endpoints[endpoint_idx];

        let total_ram = endpoint.total_ram_mb();
        if total_ram > 0 {
            self.ram.acquire(total_ram).await;
        }

        let mut core_locked = false;
        let mut in_io_queue = false;

        for step in &endpoint.steps {
            match step {
                Step::Cpu { time_s, .. } => {
                    if !core_locked {
                        self.cpu.acquire(1).await;
                        core_locked = true;
                        if in_io_queue {
                            self.io_queue_len.set(self.io_queue_len.get() - 1);
                            in_io_queue = false;
                        }
                    }
                    self.clock.timeout(*time_s).await;
                }
                Step::Io { time_s, .. } => {
                    if core_locked {
                        self.cpu.release(1);
                        core_locked = false;
                    }
                    if !in_io_queue {
                        self.io_queue_len.set(self.io_queue_len.get() + 1);
                        in_io_queue = true;
                    }
                    self.clock.timeout(*time_s).await;
                }
                Step::Ram { .. } => {
                    // No-op at execution time — already reserved above
                    // (`spec.md` §4.8 step 5).
                }
            }
        }

        if core_locked {
            self.cpu.release(1);
        } else if in_io_queue {
            self.io_queue_len.set(self.io_queue_len.get() - 1);
        }

        if total_ram > 0 {
            self.ram.release(total_ram);
        }

        trace!(server = %self.id, request = state.id, endpoint = %endpoint.name, "handled");
        self.out_edge.transport(state);
    }
}
