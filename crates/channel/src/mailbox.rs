//! A multi-producer, single-consumer mailbox for `!Send` actors.
//!
//! AsyncFlow's actors run as local tasks on a single-threaded scheduler
//! (`spec.md` §4.2, §5), so the mailbox is built on `Rc`/`RefCell` rather than
//! `tokio::sync::mpsc` — the same choice the teacher channel crate makes for
//! the same reason. A mailbox may be bounded (`capacity: Some(n)`, `put`
//! blocks when full) or unbounded (`capacity: None`, `put` never blocks),
//! matching `spec.md` §4.2.

use crate::error::{RecvError, SendError};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

struct State<T> {
    buffer: VecDeque<T>,
    capacity: Option<usize>,
    senders: usize,
    receiver_alive: bool,
    receiver_waker: Option<Waker>,
    sender_wakers: VecDeque<Waker>,
}

impl<T> State<T> {
    fn is_full(&self) -> bool {
        matches!(self.capacity, Some(cap) if self.buffer.len() >= cap)
    }

    fn wake_receiver(&mut self) {
        if let Some(w) = self.receiver_waker.take() {
            w.wake();
        }
    }

    fn wake_one_sender(&mut self) {
        if let Some(w) = self.sender_wakers.pop_front() {
            w.wake();
        }
    }
}

/// The sending half of a mailbox. Cheaply `Clone`-able; every clone counts
/// toward the mailbox's open-sender count.
pub struct MailboxSender<T> {
    state: Rc<RefCell<State<T>>>,
}

/// The receiving half of a mailbox. Not `Clone` — single-consumer.
pub struct MailboxReceiver<T> {
    state: Rc<RefCell<State<T>>>,
}

/// Creates a bounded mailbox holding at most `capacity` messages.
#[must_use]
pub fn bounded<T>(capacity: usize) -> (MailboxSender<T>, MailboxReceiver<T>) {
    new_mailbox(Some(capacity))
}

/// Creates an unbounded mailbox; `put` never blocks.
#[must_use]
pub fn unbounded<T>() -> (MailboxSender<T>, MailboxReceiver<T>) {
    new_mailbox(None)
}

fn new_mailbox<T>(capacity: Option<usize>) -> (MailboxSender<T>, MailboxReceiver<T>) {
    let state = Rc::new(RefCell::new(State {
        buffer: VecDeque::new(),
        capacity,
        senders: 1,
        receiver_alive: true,
        receiver_waker: None,
        sender_wakers: VecDeque::new(),
    }));
    (
        MailboxSender {
            state: state.clone(),
        },
        MailboxReceiver { state },
    )
}

impl<T> Clone for MailboxSender<T> {
    fn clone(&self) -> Self {
        self.state.borrow_mut().senders += 1;
        MailboxSender {
            state: self.state.clone(),
        }
    }
}

impl<T> Drop for MailboxSender<T> {
    fn drop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.senders -= 1;
        if state.senders == 0 {
            state.wake_receiver();
        }
    }
}

impl<T> Drop for MailboxReceiver<T> {
    fn drop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.receiver_alive = false;
        for w in state.sender_wakers.drain(..) {
            w.wake();
        }
    }
}

impl<T> MailboxSender<T> {
    /// Non-blocking enqueue. Returns `Err` if the mailbox is full or closed.
    pub fn try_put(&self, value: T) -> Result<(), SendError<T>> {
        let mut state = self.state.borrow_mut();
        if !state.receiver_alive {
            return Err(SendError::Closed(value));
        }
        if state.is_full() {
            return Err(SendError::Full(value));
        }
        state.buffer.push_back(value);
        state.wake_receiver();
        Ok(())
    }

    /// Enqueues `value`, suspending the caller while the mailbox is full.
    /// Never blocks on an unbounded mailbox.
    pub async fn put(&self, value: T) -> Result<(), SendError<T>> {
        PutFuture {
            sender: self,
            value: Some(value),
        }
        .await
    }
}

impl<T> MailboxReceiver<T> {
    /// Non-blocking dequeue.
    pub fn try_get(&self) -> Result<T, RecvError> {
        let mut state = self.state.borrow_mut();
        if let Some(value) = state.buffer.pop_front() {
            state.wake_one_sender();
            Ok(value)
        } else if state.senders == 0 {
            Err(RecvError::Closed)
        } else {
            Err(RecvError::Empty)
        }
    }

    /// Suspends the caller until a message is available or the mailbox is
    /// permanently empty (all senders dropped).
    pub async fn get(&self) -> Result<T, RecvError> {
        GetFuture { receiver: self }.await
    }

    /// Number of messages currently buffered; used by metrics/tests only.
    pub fn len(&self) -> usize {
        self.state.borrow().buffer.len()
    }

    /// Whether the mailbox currently holds no messages.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct PutFuture<'a, T> {
    sender: &'a MailboxSender<T>,
    value: Option<T>,
}

impl<T> Future for PutFuture<'_, T> {
    type Output = Result<(), SendError<T>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let value = self.value.take().expect("PutFuture polled after completion");
        match self.sender.try_put(value) {
            Ok(()) => Poll::Ready(Ok(())),
            Err(SendError::Full(value)) => {
                self.value = Some(value);
                self.sender
                    .state
                    .borrow_mut()
                    .sender_wakers
                    .push_back(cx.waker().clone());
                Poll::Pending
            }
            Err(e) => Poll::Ready(Err(e)),
        }
    }
}

struct GetFuture<'a, T> {
    receiver: &'a MailboxReceiver<T>,
}

impl<T> Future for GetFuture<'_, T> {
    type Output = Result<T, RecvError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.receiver.try_get() {
            Ok(v) => Poll::Ready(Ok(v)),
            Err(RecvError::Empty) => {
                self.receiver.state.borrow_mut().receiver_waker = Some(cx.waker().clone());
                Poll::Pending
            }
            Err(e) => Poll::Ready(Err(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "current_thread")]
    async fn bounded_blocks_when_full() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let (tx, rx) = bounded::<i32>(1);
                tx.put(1).await.unwrap();
                assert!(matches!(tx.try_put(2), Err(SendError::Full(2))));
                assert_eq!(rx.get().await.unwrap(), 1);
                tx.put(2).await.unwrap();
                assert_eq!(rx.get().await.unwrap(), 2);
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread")]
    async fn fifo_ordering_is_preserved() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let (tx, rx) = unbounded::<i32>();
                for i in 0..5 {
                    tx.try_put(i).unwrap();
                }
                for i in 0..5 {
                    assert_eq!(rx.get().await.unwrap(), i);
                }
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread")]
    async fn closed_after_all_senders_drop() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let (tx, rx) = unbounded::<i32>();
                drop(tx);
                assert_eq!(rx.get().await.unwrap_err(), RecvError::Closed);
            })
            .await;
    }
}
