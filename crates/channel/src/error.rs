// Errors for the mailbox channel.
//
// Important note: avoid `!Send` data types here so these errors remain usable
// from both local and (hypothetical) shared contexts, mirroring the channel
// crate this is grounded on.

/// Errors that can occur sending a message into a mailbox.
#[derive(thiserror::Error, Debug)]
pub enum SendError<T> {
    /// The mailbox is full (bounded) and the message could not be enqueued.
    #[error("mailbox is full and the message could not be sent")]
    Full(T),

    /// The mailbox has no receiver left and the message could not be delivered.
    #[error("mailbox is closed and the message could not be sent")]
    Closed(T),
}

impl<T> SendError<T> {
    /// Returns the value that failed to send, regardless of the reason.
    pub fn into_inner(self) -> T {
        match self {
            Self::Full(t) => t,
            Self::Closed(t) => t,
        }
    }
}

/// Errors that can occur receiving a message from a mailbox.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecvError {
    /// No senders remain and the buffer is drained; no further message will arrive.
    #[error("mailbox is closed")]
    Closed,

    /// The mailbox has no message ready right now.
    #[error("mailbox is empty")]
    Empty,
}
