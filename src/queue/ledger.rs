//! Set of links ever accepted into the pipeline.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use tracing::trace;

use crate::parser::Link;

/// Deduplication ledger keyed by canonical link.
///
/// Entries are never removed for the lifetime of the process: a link that
/// failed to download is still considered seen.
#[derive(Debug, Default)]
pub struct DedupLedger {
    seen: Mutex<HashSet<Link>>,
}

impl DedupLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the link has already been accepted.
    #[must_use]
    pub fn seen(&self, link: &Link) -> bool {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(link)
    }

    /// Records the link, returning true if it was not seen before.
    ///
    /// The check and the insert happen under one lock, so two concurrent
    /// callers with the same link cannot both get `true`.
    pub fn mark_seen(&self, link: &Link) -> bool {
        let inserted = self
            .seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(link.clone());
        trace!(link = %link, inserted, "ledger check");
        inserted
    }

    /// Number of distinct links recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns true if no link has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::parser::match_link;

    fn link(id: &str) -> Link {
        match_link(&format!("youtu.be/{id}")).unwrap()
    }

    #[test]
    fn test_ledger_starts_empty() {
        let ledger = DedupLedger::new();
        assert!(ledger.is_empty());
        assert!(!ledger.seen(&link("a")));
    }

    #[test]
    fn test_ledger_mark_seen_first_time_returns_true() {
        let ledger = DedupLedger::new();
        assert!(ledger.mark_seen(&link("a")));
        assert!(ledger.seen(&link("a")));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_ledger_mark_seen_twice_returns_false() {
        let ledger = DedupLedger::new();
        assert!(ledger.mark_seen(&link("a")));
        assert!(!ledger.mark_seen(&link("a")));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_ledger_concurrent_mark_seen_single_winner() {
        let ledger = Arc::new(DedupLedger::new());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                thread::spawn(move || ledger.mark_seen(&link("race")))
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|inserted| *inserted)
            .count();

        assert_eq!(winners, 1);
        assert_eq!(ledger.len(), 1);
    }
}
