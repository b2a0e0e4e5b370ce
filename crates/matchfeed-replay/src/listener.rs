//! Per-subscriber connection state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;

/// One replay subscriber.
///
/// Delivery is non-blocking: a full or closed channel drops the message and
/// bumps the drop counter instead of stalling the emitter loop.
#[derive(Debug)]
pub struct ReplayListener {
    /// Unique listener ID.
    pub id: String,
    /// Send channel to the subscriber's write task.
    tx: mpsc::Sender<Arc<String>>,
    /// Messages dropped due to a full channel.
    dropped_messages: AtomicU64,
}

impl ReplayListener {
    /// Create a listener around its outbound channel.
    pub fn new(id: String, tx: mpsc::Sender<Arc<String>>) -> Self {
        Self {
            id,
            tx,
            dropped_messages: AtomicU64::new(0),
        }
    }

    /// Send a serialized message without blocking.
    ///
    /// Returns `false` if the channel is full or closed, and increments the
    /// drop counter.
    pub fn send(&self, message: Arc<String>) -> bool {
        if self.tx.try_send(message).is_ok() {
            true
        } else {
            let _ = self.dropped_messages.fetch_add(1, Ordering::Relaxed);
            false
        }
    }

    /// Whether the subscriber's channel has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Total messages dropped for this listener.
    #[must_use]
    pub fn drop_count(&self) -> u64 {
        self.dropped_messages.load(Ordering::Relaxed)
    }
}
