//! Channel-backed stream abstraction for search results.
//!
//! A producer task sends items through an unbounded channel; the
//! consumer pulls them as a lazy, finite, non-restartable
//! [`futures::Stream`]. Dropping the stream drops the receiver, which
//! the producer observes as a send error and treats as a stop request.

use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// A handle to an asynchronous operation that produces multiple results.
pub struct AsyncStream<T> {
    inner: UnboundedReceiverStream<T>,
}

impl<T> AsyncStream<T> {
    /// Create from an unbounded receiver.
    #[inline]
    #[must_use]
    pub fn new(rx: mpsc::UnboundedReceiver<T>) -> Self {
        Self {
            inner: UnboundedReceiverStream::new(rx),
        }
    }

    /// Create a sender/stream pair.
    ///
    /// The stream terminates once every sender handle is dropped.
    #[must_use]
    pub fn channel() -> (mpsc::UnboundedSender<T>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self::new(rx))
    }

    /// Create from a vector (for testing/simple cases).
    #[must_use]
    pub fn from_vec(items: Vec<T>) -> Self
    where
        T: Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::task::spawn(async move {
            for item in items {
                if tx.send(item).is_err() {
                    break; // Receiver dropped
                }
            }
        });
        Self::new(rx)
    }
}

impl<T> Stream for AsyncStream<T> {
    type Item = T;

    #[inline]
    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
