//! Mailbox channel optimized for AsyncFlow's single-threaded actor runtime.

pub mod error;
pub mod mailbox;

pub use mailbox::{bounded, unbounded, MailboxReceiver, MailboxSender};
