//! Clipboard polling loop (the producer side).

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, instrument};

use super::{Coordinator, SubmitOutcome};
use crate::events::LifecycleEvent;
use crate::parser::{Link, match_link};
use crate::source::BufferSource;

/// What a single poll tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Buffer content identical to the previous tick.
    Unchanged,
    /// Content changed but holds no recognized link.
    NoLink,
    /// A new link was queued.
    Enqueued { link: Link, depth: usize },
    /// A link was found but had been accepted before.
    Duplicate(Link),
    /// The buffer could not be read; the loop carries on.
    ReadFailed,
}

/// Samples a [`BufferSource`] at a fixed interval and submits new links.
///
/// The poller never waits on the worker: submission only touches the
/// ledger and the queue.
pub struct SourcePoller<S> {
    source: S,
    coordinator: Arc<Coordinator>,
    interval: Duration,
    last_seen: String,
}

impl<S: BufferSource> SourcePoller<S> {
    /// Creates a poller. The first tick treats any non-empty content as a change.
    pub fn new(source: S, coordinator: Arc<Coordinator>, interval: Duration) -> Self {
        Self {
            source,
            coordinator,
            interval,
            last_seen: String::new(),
        }
    }

    /// Poll interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Reads the buffer once and submits a link if the content changed.
    #[instrument(level = "trace", skip(self))]
    pub async fn tick(&mut self) -> TickOutcome {
        let content = match self.source.read().await {
            Ok(content) => content,
            Err(error) => {
                error!(error = %error, "Error in monitor loop");
                return TickOutcome::ReadFailed;
            }
        };

        if content == self.last_seen {
            return TickOutcome::Unchanged;
        }
        self.last_seen = content;

        let Some(link) = match_link(&self.last_seen) else {
            debug!(content_len = self.last_seen.len(), "clipboard changed, no link");
            return TickOutcome::NoLink;
        };
        if self.coordinator.ledger().seen(&link) {
            debug!(link = %link, "link already handled, ignoring");
            return TickOutcome::Duplicate(link);
        }
        info!(link = %link, "YouTube URL detected");

        match self.coordinator.submit(link.clone()) {
            SubmitOutcome::Enqueued { depth } => TickOutcome::Enqueued { link, depth },
            SubmitOutcome::Duplicate => TickOutcome::Duplicate(link),
        }
    }

    /// Polls until `shutdown` resolves.
    ///
    /// Emits [`LifecycleEvent::Monitoring`] on entry and
    /// [`LifecycleEvent::Stopped`] on exit. A shutdown that arrives during a
    /// tick takes effect once the tick completes. The worker is not stopped
    /// here.
    pub async fn run<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        info!(interval_ms = self.interval.as_millis(), "Starting clipboard monitor...");
        self.coordinator.emit(LifecycleEvent::Monitoring);

        loop {
            self.tick().await;

            tokio::select! {
                biased;
                () = &mut shutdown => break,
                () = tokio::time::sleep(self.interval) => {}
            }
        }

        info!("Stopping clipboard monitor...");
        self.coordinator.emit(LifecycleEvent::Stopped);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio::sync::mpsc;

    use super::*;
    use crate::events::{ChannelSink, EventKind};
    use crate::source::SourceError;

    /// Returns scripted reads, repeating the last one forever.
    struct ScriptedSource {
        reads: Mutex<VecDeque<Result<String, SourceError>>>,
        last: Mutex<String>,
    }

    impl ScriptedSource {
        fn new(reads: Vec<Result<String, SourceError>>) -> Self {
            Self {
                reads: Mutex::new(reads.into()),
                last: Mutex::new(String::new()),
            }
        }
    }

    #[async_trait]
    impl BufferSource for ScriptedSource {
        async fn read(&self) -> Result<String, SourceError> {
            match self.reads.lock().unwrap().pop_front() {
                Some(Ok(text)) => {
                    *self.last.lock().unwrap() = text.clone();
                    Ok(text)
                }
                Some(Err(error)) => Err(error),
                None => Ok(self.last.lock().unwrap().clone()),
            }
        }
    }

    fn text(value: &str) -> Result<String, SourceError> {
        Ok(value.to_string())
    }

    fn read_error() -> Result<String, SourceError> {
        Err(SourceError::Clipboard(arboard::Error::ClipboardOccupied))
    }

    fn poller(
        reads: Vec<Result<String, SourceError>>,
    ) -> (
        SourcePoller<ScriptedSource>,
        Arc<Coordinator>,
        mpsc::UnboundedReceiver<LifecycleEvent>,
    ) {
        let (sink, rx) = ChannelSink::new();
        let coordinator = Arc::new(Coordinator::new(Arc::new(sink)));
        let poller = SourcePoller::new(
            ScriptedSource::new(reads),
            Arc::clone(&coordinator),
            Duration::from_millis(5),
        );
        (poller, coordinator, rx)
    }

    #[tokio::test]
    async fn test_tick_detects_link_in_changed_content() {
        let (mut poller, coordinator, mut rx) =
            poller(vec![text("check this out https://youtu.be/abc123XYZ9 nice")]);

        let outcome = poller.tick().await;

        let link = match_link("https://youtu.be/abc123XYZ9").unwrap();
        assert_eq!(outcome, TickOutcome::Enqueued { link, depth: 1 });
        assert_eq!(coordinator.queue().size(), 1);
        assert_eq!(rx.try_recv().unwrap().kind(), EventKind::Enqueued);
    }

    #[tokio::test]
    async fn test_tick_unchanged_content_does_nothing() {
        let (mut poller, coordinator, mut rx) = poller(vec![
            text("https://youtu.be/abc123XYZ9"),
            text("https://youtu.be/abc123XYZ9"),
        ]);

        poller.tick().await;
        let _ = rx.try_recv();
        let second = poller.tick().await;

        assert_eq!(second, TickOutcome::Unchanged);
        assert_eq!(coordinator.queue().size(), 1);
        assert_eq!(coordinator.ledger().len(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_tick_same_link_recopied_is_duplicate() {
        let watch = "https://www.youtube.com/watch?v=abc123XYZ9";
        let (mut poller, coordinator, _rx) =
            poller(vec![text(watch), text("something else"), text(watch)]);

        poller.tick().await;
        assert_eq!(poller.tick().await, TickOutcome::NoLink);
        let third = poller.tick().await;

        assert!(matches!(third, TickOutcome::Duplicate(_)));
        assert_eq!(coordinator.ledger().len(), 1);
        assert_eq!(coordinator.queue().size(), 1);
    }

    #[tokio::test]
    async fn test_tick_empty_initial_buffer_is_unchanged() {
        let (mut poller, _coordinator, _rx) = poller(vec![text("")]);
        assert_eq!(poller.tick().await, TickOutcome::Unchanged);
    }

    #[tokio::test]
    async fn test_tick_read_error_is_not_fatal() {
        let (mut poller, coordinator, _rx) =
            poller(vec![read_error(), text("youtu.be/after_error")]);

        assert_eq!(poller.tick().await, TickOutcome::ReadFailed);
        assert!(matches!(poller.tick().await, TickOutcome::Enqueued { .. }));
        assert_eq!(coordinator.queue().size(), 1);
    }

    #[tokio::test]
    async fn test_run_emits_monitoring_then_stopped() {
        let (mut poller, coordinator, mut rx) = poller(vec![text("youtu.be/one")]);

        poller
            .run(tokio::time::sleep(Duration::from_millis(30)))
            .await;

        let mut kinds = Vec::new();
        while let Ok(event) = rx.try_recv() {
            kinds.push(event.kind());
        }
        assert_eq!(
            kinds,
            vec![EventKind::Monitoring, EventKind::Enqueued, EventKind::Stopped]
        );
        assert_eq!(coordinator.queue().size(), 1);
    }

    #[tokio::test]
    async fn test_run_with_ready_shutdown_completes_one_tick() {
        let (mut poller, coordinator, _rx) = poller(vec![text("youtu.be/one")]);

        poller.run(std::future::ready(())).await;

        assert_eq!(coordinator.queue().size(), 1);
    }
}
