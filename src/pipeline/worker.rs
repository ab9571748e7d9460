//! The single download worker (the consumer side).
//!
//! Exactly one worker exists per pipeline, so at most one download is ever
//! in flight. Items are taken in FIFO order; each is attempted once and
//! its failure never affects the items after it.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use futures_util::FutureExt;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info, warn};

use super::Coordinator;
use crate::download::{DownloadOptions, MediaDownloader};
use crate::events::{ERROR_MESSAGE_CHARS, LifecycleEvent, truncate_chars};
use crate::parser::Link;
use crate::queue::QueueEntry;

/// Lifecycle of the worker task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Blocked on an empty queue.
    Waiting,
    /// Executing a download.
    Running,
    /// Consumed a stop request and exited.
    Terminated,
}

/// Counters for processed items.
#[derive(Debug, Default)]
pub struct WorkerStats {
    completed: AtomicUsize,
    failed: AtomicUsize,
}

impl WorkerStats {
    /// Number of successful downloads.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Number of failed downloads.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    /// Items processed either way.
    #[must_use]
    pub fn total(&self) -> usize {
        self.completed() + self.failed()
    }
}

/// Handle to a running worker.
#[derive(Debug)]
pub struct WorkerHandle {
    task: JoinHandle<()>,
    state: watch::Receiver<WorkerState>,
    stats: Arc<WorkerStats>,
    coordinator: Arc<Coordinator>,
}

impl WorkerHandle {
    /// Current state.
    #[must_use]
    pub fn state(&self) -> WorkerState {
        *self.state.borrow()
    }

    /// A receiver that observes every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<WorkerState> {
        self.state.clone()
    }

    /// Completed and failed counters.
    #[must_use]
    pub fn stats(&self) -> &WorkerStats {
        &self.stats
    }

    /// True once the task has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Drains everything queued so far, then exits.
    ///
    /// # Errors
    ///
    /// Returns the [`JoinError`] if the worker task was cancelled.
    pub async fn stop(self) -> Result<(), JoinError> {
        self.coordinator.request_stop();
        self.task.await
    }

    /// Drops pending items and cancels the in-flight download.
    ///
    /// The download future is dropped, which kills the tool's child process.
    pub fn abandon(self) {
        for link in self.coordinator.queue().pending() {
            warn!(link = %link, "Abandoning queued download");
        }
        self.task.abort();
    }
}

/// Starts the worker on the current tokio runtime.
pub fn spawn_worker(
    coordinator: Arc<Coordinator>,
    downloader: Arc<dyn MediaDownloader>,
    options: DownloadOptions,
) -> WorkerHandle {
    let (state_tx, state_rx) = watch::channel(WorkerState::Waiting);
    let stats = Arc::new(WorkerStats::default());

    let worker = Worker {
        coordinator: Arc::clone(&coordinator),
        downloader,
        options,
        state: state_tx,
        stats: Arc::clone(&stats),
    };
    let task = tokio::spawn(worker.run());

    WorkerHandle {
        task,
        state: state_rx,
        stats,
        coordinator,
    }
}

struct Worker {
    coordinator: Arc<Coordinator>,
    downloader: Arc<dyn MediaDownloader>,
    options: DownloadOptions,
    state: watch::Sender<WorkerState>,
    stats: Arc<WorkerStats>,
}

impl Worker {
    async fn run(self) {
        info!("Download worker started");
        loop {
            let entry = self.coordinator.queue().pop().await;
            let QueueEntry::Item(link) = entry else {
                break;
            };

            self.state.send_replace(WorkerState::Running);
            self.process(link).await;
            self.state.send_replace(WorkerState::Waiting);
        }
        self.state.send_replace(WorkerState::Terminated);
        info!(
            processed = self.stats.total(),
            completed = self.stats.completed(),
            failed = self.stats.failed(),
            "Download worker stopped"
        );
    }

    async fn process(&self, link: Link) {
        let _in_flight = self.coordinator.begin_download(link.clone());
        let remaining = self.coordinator.queue().size();
        info!(link = %link, remaining, "Starting download");
        self.coordinator.emit(LifecycleEvent::Started {
            link: link.clone(),
            remaining,
        });

        let started = Instant::now();
        let result = AssertUnwindSafe(self.downloader.download(&link, &self.options))
            .catch_unwind()
            .await;
        let elapsed_ms = started.elapsed().as_millis();

        let failure = match result {
            Ok(Ok(outcome)) => {
                self.stats.completed.fetch_add(1, Ordering::SeqCst);
                info!(
                    link = %link,
                    title = %outcome.title,
                    path = %outcome.output_path.display(),
                    items = outcome.item_count,
                    elapsed_ms,
                    "Successfully downloaded"
                );
                self.coordinator.emit(LifecycleEvent::Completed {
                    link,
                    title: outcome.title,
                    remaining: self.coordinator.queue().size(),
                });
                return;
            }
            Ok(Err(error)) => error.to_string(),
            Err(panic) => format!("download task panicked: {}", panic_message(panic.as_ref())),
        };

        self.stats.failed.fetch_add(1, Ordering::SeqCst);
        error!(link = %link, error = %failure, elapsed_ms, "Download failed");
        self.coordinator.emit(LifecycleEvent::Failed {
            link,
            error: truncate_chars(&failure, ERROR_MESSAGE_CHARS),
        });
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
