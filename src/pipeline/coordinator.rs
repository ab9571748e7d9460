//! Shared pipeline state: ledger, queue and the in-flight download.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::events::{EventSink, LifecycleEvent};
use crate::parser::Link;
use crate::queue::{DedupLedger, WorkQueue};

/// The download the worker is currently executing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentDownload {
    pub link: Link,
    pub started_at: DateTime<Utc>,
}

/// Result of offering a link to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The link was new and is now queued at this depth.
    Enqueued { depth: usize },
    /// The link was accepted before (queued, downloaded or failed) and is ignored.
    Duplicate,
}

/// State shared by the source poller (producer) and the worker (consumer).
///
/// Created once and handed to both tasks through an `Arc`. Each field group
/// has its own lock; no lock is held across an await point.
pub struct Coordinator {
    ledger: DedupLedger,
    queue: WorkQueue,
    current: Mutex<Option<CurrentDownload>>,
    events: Arc<dyn EventSink>,
}

impl Coordinator {
    /// Creates an empty pipeline that reports to `events`.
    #[must_use]
    pub fn new(events: Arc<dyn EventSink>) -> Self {
        Self {
            ledger: DedupLedger::new(),
            queue: WorkQueue::new(),
            current: Mutex::new(None),
            events,
        }
    }

    /// Offers a link to the pipeline.
    ///
    /// A link is queued at most once per process lifetime: the ledger
    /// check-and-mark is atomic, so concurrent submissions of the same link
    /// produce exactly one `Enqueued`. A new link emits
    /// [`LifecycleEvent::Enqueued`] with the queue depth and the link in flight.
    pub fn submit(&self, link: Link) -> SubmitOutcome {
        if !self.ledger.mark_seen(&link) {
            info!(link = %link, "URL already downloaded or in queue");
            return SubmitOutcome::Duplicate;
        }

        let depth = self.queue.push(link.clone());
        let current = self.current().map(|download| download.link);
        info!(link = %link, position = depth, "Added to queue");

        self.emit(LifecycleEvent::Enqueued {
            link,
            depth,
            current,
        });
        SubmitOutcome::Enqueued { depth }
    }

    /// Asks the worker to exit once everything queued so far is processed.
    pub fn request_stop(&self) {
        debug!("queueing worker stop");
        self.queue.push_stop();
    }

    /// Snapshot of the in-flight download, if any.
    #[must_use]
    pub fn current(&self) -> Option<CurrentDownload> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Ledger of every link ever accepted.
    #[must_use]
    pub fn ledger(&self) -> &DedupLedger {
        &self.ledger
    }

    /// Pending links.
    #[must_use]
    pub fn queue(&self) -> &WorkQueue {
        &self.queue
    }

    /// Hands an event to the sink.
    pub fn emit(&self, event: LifecycleEvent) {
        self.events.emit(event);
    }

    /// Records `link` as the in-flight download until the guard is dropped.
    pub(crate) fn begin_download(&self, link: Link) -> InFlight<'_> {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        debug_assert!(current.is_none(), "a download is already in flight");
        *current = Some(CurrentDownload {
            link,
            started_at: Utc::now(),
        });
        InFlight { coordinator: self }
    }
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("queued", &self.queue().size())
            .field("seen", &self.ledger().len())
            .field("current", &self.current())
            .finish_non_exhaustive()
    }
}

/// Clears the current download when dropped, whatever the outcome.
pub(crate) struct InFlight<'a> {
    coordinator: &'a Coordinator,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.coordinator
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}
