//! Stage queues: FIFO hand-off between pipeline stages.
//!
//! A [`StageQueue`] carries entries from one stage's producers to the next
//! stage's consumers. Pushes never block (capacity is unbounded); pops wait
//! up to a caller-supplied timeout and return `None` when no work arrived —
//! an idle pipeline is a normal outcome, not an error. Delivery is FIFO and
//! exactly-once: a pushed entry reaches a single consumer.

use std::collections::HashSet;
use std::hash::Hash;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::time::timeout;

/// An unbounded FIFO hand-off with timed blocking pops and a stale-tolerated
/// snapshot of the entries currently queued.
pub struct StageQueue<T> {
    sender: mpsc::UnboundedSender<T>,
    receiver: tokio::sync::Mutex<mpsc::UnboundedReceiver<T>>,
    pending: Mutex<HashSet<T>>,
}

impl<T: Clone + Eq + Hash> StageQueue<T> {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver: tokio::sync::Mutex::new(receiver),
            pending: Mutex::new(HashSet::new()),
        }
    }

    /// Makes the entry visible to exactly one future [`pop`](Self::pop).
    /// Never blocks.
    pub fn push(&self, entry: T) {
        self.pending.lock().insert(entry.clone());
        // The receiver lives in this struct, so the channel cannot be closed
        // while `self` is alive.
        let _ = self.sender.send(entry);
    }

    /// Waits up to `wait` for an entry. Consumers contend on the shared
    /// receiver; each entry is handed to exactly one of them, in push order.
    pub async fn pop(&self, wait: Duration) -> Option<T> {
        let mut receiver = self.receiver.lock().await;
        match timeout(wait, receiver.recv()).await {
            Ok(Some(entry)) => {
                self.pending.lock().remove(&entry);
                Some(entry)
            }
            Ok(None) | Err(_) => None,
        }
    }

    /// The entries currently queued. A snapshot, not a live view: it may be
    /// stale the instant after it is taken.
    pub fn snapshot(&self) -> HashSet<T> {
        self.pending.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}

impl<T: Clone + Eq + Hash> Default for StageQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
