//! Pending work and deduplication state.
//!
//! The queue system consists of:
//! - [`WorkQueue`] - Unbounded FIFO of pending links, single consumer
//! - [`QueueEntry`] - Queue element: a link or the `Stop` poison entry
//! - [`DedupLedger`] - Links ever accepted, consulted before enqueue
//!
//! # Example
//!
//! ```
//! use tubewatch_core::parser::match_link;
//! use tubewatch_core::queue::{QueueEntry, WorkQueue};
//!
//! # tokio_test::block_on(async {
//! let queue = WorkQueue::new();
//! let link = match_link("youtu.be/abc123").unwrap();
//! queue.push(link.clone());
//! queue.push_stop();
//!
//! assert_eq!(queue.pop().await, QueueEntry::Item(link));
//! assert_eq!(queue.pop().await, QueueEntry::Stop);
//! # });
//! ```

mod item;
mod ledger;

pub use item::QueueEntry;
pub use ledger::DedupLedger;

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use tokio::sync::Notify;
use tracing::trace;

use crate::parser::Link;

/// Unbounded, insertion-ordered queue of pending links.
///
/// `push` never blocks. `pop` suspends the caller until an entry is
/// available. Intended for a single consumer: one stored wakeup is enough
/// because only one task ever waits.
#[derive(Debug, Default)]
pub struct WorkQueue {
    state: Mutex<QueueState>,
    available: Notify,
}

#[derive(Debug, Default)]
struct QueueState {
    entries: VecDeque<QueueEntry>,
    /// Number of `Item` entries; a queued `Stop` is not pending work.
    links: usize,
}

impl WorkQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a link to the tail and returns the resulting link depth.
    pub fn push(&self, link: Link) -> usize {
        self.push_entry(QueueEntry::Item(link))
    }

    /// Appends the poison entry. Entries queued before it are still delivered.
    pub fn push_stop(&self) {
        self.push_entry(QueueEntry::Stop);
    }

    fn push_entry(&self, entry: QueueEntry) -> usize {
        let depth = {
            let mut state = self.lock();
            if !entry.is_stop() {
                state.links += 1;
            }
            state.entries.push_back(entry);
            state.links
        };
        trace!(depth, "queue push");
        self.available.notify_one();
        depth
    }

    /// Removes and returns the head, waiting until one is available.
    pub async fn pop(&self) -> QueueEntry {
        loop {
            if let Some(entry) = self.try_pop() {
                return entry;
            }
            self.available.notified().await;
        }
    }

    /// Removes and returns the head without waiting.
    #[must_use]
    pub fn try_pop(&self) -> Option<QueueEntry> {
        let mut state = self.lock();
        let entry = state.entries.pop_front()?;
        if !entry.is_stop() {
            state.links -= 1;
        }
        Some(entry)
    }

    /// Number of pending links. A queued `Stop` is not counted.
    ///
    /// Informational only: the value may be stale by the time it is used.
    #[must_use]
    pub fn size(&self) -> usize {
        self.lock().links
    }

    /// Snapshot of the pending links in queue order.
    #[must_use]
    pub fn pending(&self) -> Vec<Link> {
        self.lock()
            .entries
            .iter()
            .filter_map(|entry| entry.link().cloned())
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::parser::match_link;

    fn link(id: &str) -> Link {
        match_link(&format!("youtu.be/{id}")).unwrap()
    }

    #[test]
    fn test_push_returns_depth() {
        let queue = WorkQueue::new();
        assert_eq!(queue.push(link("a")), 1);
        assert_eq!(queue.push(link("b")), 2);
        assert_eq!(queue.size(), 2);
    }

    #[tokio::test]
    async fn test_pop_is_fifo() {
        let queue = WorkQueue::new();
        for id in ["a", "b", "c"] {
            queue.push(link(id));
        }

        assert_eq!(queue.pop().await, QueueEntry::Item(link("a")));
        assert_eq!(queue.pop().await, QueueEntry::Item(link("b")));
        assert_eq!(queue.pop().await, QueueEntry::Item(link("c")));
        assert_eq!(queue.size(), 0);
    }

    #[tokio::test]
    async fn test_pop_waits_for_push() {
        let queue = Arc::new(WorkQueue::new());
        let consumer = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.pop().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!consumer.is_finished());

        queue.push(link("late"));
        let entry = tokio::time::timeout(Duration::from_secs(1), consumer)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(entry, QueueEntry::Item(link("late")));
    }

    #[tokio::test]
    async fn test_stop_is_delivered_after_earlier_items() {
        let queue = WorkQueue::new();
        queue.push(link("a"));
        queue.push_stop();

        assert_eq!(queue.pop().await, QueueEntry::Item(link("a")));
        assert_eq!(queue.pop().await, QueueEntry::Stop);
    }

    #[test]
    fn test_try_pop_empty_returns_none() {
        let queue = WorkQueue::new();
        assert!(queue.try_pop().is_none());
    }

    #[test]
    fn test_pending_skips_stop_entry() {
        let queue = WorkQueue::new();
        queue.push(link("a"));
        queue.push_stop();
        assert_eq!(queue.pending(), vec![link("a")]);
    }

    #[tokio::test]
    async fn test_size_ignores_queued_stop() {
        let queue = WorkQueue::new();
        queue.push(link("a"));
        queue.push_stop();
        assert_eq!(queue.size(), 1);
        assert_eq!(queue.push(link("b")), 2);

        assert_eq!(queue.pop().await, QueueEntry::Item(link("a")));
        assert_eq!(queue.size(), 1);
        assert_eq!(queue.pop().await, QueueEntry::Stop);
        assert_eq!(queue.size(), 1);
        assert_eq!(queue.pop().await, QueueEntry::Item(link("b")));
        assert_eq!(queue.size(), 0);
    }
}
