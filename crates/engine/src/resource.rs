//! Shared FIFO-fair resource primitive backing the CPU token bucket
//! (`spec.md` §4.3) and the RAM reservoir (`spec.md` §4.4).
//!
//! Both resources block `acquire` until enough of an integer quantity is
//! available, release it back, and wake waiters strictly in FIFO
//! wait-start order — "partial wake is allowed only for the head waiter"
//! (`spec.md` §4.4): a release only ever re-examines the waiter at the
//! front of the queue, never skips ahead to satisfy a smaller request
//! behind it. This mirrors the waker-queue discipline
//! `otap-df-channel::mpsc` uses for its bounded channel, generalized from a
//! single slot to an arbitrary integer amount.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

struct Waiter {
    requested: u32,
    granted: bool,
    waker: Option<Waker>,
}

struct State {
    available: u32,
    capacity: u32,
    waiters: VecDeque<Rc<RefCell<Waiter>>>,
}

/// A FIFO-fair divisible resource: `cpu_cores` counting-semaphore tokens or
/// `ram_mb` megabytes, depending on which domain wrapper constructs it.
#[derive(Clone)]
pub struct FifoResource {
    state: Rc<RefCell<State>>,
}

impl FifoResource {
    pub fn new(capacity: u32) -> Self {
        Self {
            state: Rc::new(RefCell::new(State {
                available: capacity,
                capacity,
                waiters: VecDeque::new(),
            })),
        }
    }

    /// Currently-available amount; used by the sampled metric collector.
    pub fn available(&self) -> u32 {
        self.state.borrow().available
    }

    pub fn capacity(&self) -> u32 {
        self.state.borrow().capacity
    }

    /// Suspends until `amount` units are available, then atomically
    /// subtracts them.
    pub fn acquire(&self, amount: u32) -> Acquire {
        Acquire {
            resource: self.clone(),
            amount,
            slot: None,
        }
    }

    /// Adds `amount` back and wakes the head waiter if it can now proceed.
    /// Releasing more than `capacity - available` would exceed capacity and
    /// is an engine consistency bug (`spec.md` §7 kind 3), not a user error.
    pub fn release(&self, amount: u32) {
        if amount == 0 {
            return;
        }
        let mut state = self.state.borrow_mut();
        state.available = state
            .available
            .checked_add(amount)
            .expect("RAM/CPU over-release: counter overflow");
        debug_assert!(
            state.available <= state.capacity,
            "released more than capacity — simulation consistency error"
        );
        while let Some(front) = state.waiters.front() {
            let mut w = front.borrow_mut();
            if w.requested <= state.available {
                state.available -= w.requested;
                w.granted = true;
                if let Some(waker) = w.waker.take() {
                    waker.wake();
                }
                drop(w);
                let _ = state.waiters.pop_front();
            } else {
                break;
            }
        }
    }
}

/// Future returned by [`FifoResource::acquire`].
pub struct Acquire {
    resource: FifoResource,
    amount: u32,
    slot: Option<Rc<RefCell<Waiter>>>,
}

impl Future for Acquire {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if let Some(slot) = &self.slot {
            let granted = slot.borrow().granted;
            return if granted { Poll::Ready(()) } else {
                slot.borrow_mut().waker = Some(cx.waker().clone());
                Poll::Pending
            };
        }

        let mut state = self.resource.state.borrow_mut();
        if state.waiters.is_empty() && self.amount <= state.available {
            state.available -= self.amount;
            return Poll::Ready(());
        }
        let slot = Rc::new(RefCell::new(Waiter {
            requested: self.amount,
            granted: false,
            waker: Some(cx.waker().clone()),
        }));
        state.waiters.push_back(slot.clone());
        drop(state);
        self.slot = Some(slot);
        Poll::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "current_thread")]
    async fn fifo_order_is_respected_even_when_a_later_waiter_would_fit() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let res = FifoResource::new(1);
                res.acquire(1).await; // drain to zero

                let order = Rc::new(RefCell::new(Vec::<&'static str>::new()));
                let res_a = res.clone();
                let order_a = order.clone();
                let a = tokio::task::spawn_local(async move {
                    res_a.acquire(1).await;
                    order_a.borrow_mut().push("a");
                });
                tokio::task::yield_now().await;

                let res_b = res.clone();
                let order_b = order.clone();
                let b = tokio::task::spawn_local(async move {
                    res_b.acquire(1).await;
                    order_b.borrow_mut().push("b");
                });
                tokio::task::yield_now().await;

                res.release(1);
                a.await.unwrap();
                res.release(1);
                b.await.unwrap();

                assert_eq!(*order.borrow(), vec!["a", "b"]);
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread")]
    async fn divisible_acquire_blocks_until_sufficient() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let ram = FifoResource::new(256);
                ram.acquire(200).await;
                assert_eq!(ram.available(), 56);
                let ram2 = ram.clone();
                let waiter = tokio::task::spawn_local(async move {
                    ram2.acquire(100).await;
                });
                tokio::task::yield_now().await;
                ram.release(200);
                waiter.await.unwrap();
                assert_eq!(ram.available(), 156);
            })
            .await;
    }
}
