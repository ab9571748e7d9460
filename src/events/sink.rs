//! Event sinks: where lifecycle events go once emitted.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, trace, warn};

use super::{LifecycleEvent, Notifier};

/// Consumer of lifecycle events.
///
/// `emit` must not block and must not fail: the pipeline calls it from the
/// poll loop and the worker loop.
pub trait EventSink: Send + Sync {
    /// Receives one event.
    fn emit(&self, event: LifecycleEvent);
}

/// Logs every event and, when enabled, shows it as a desktop notification.
///
/// Notifications are dispatched on separate tokio tasks; failures are
/// logged and never reach the pipeline. Dispatched tasks are tracked so
/// that [`flush`](Self::flush) can wait for them before the runtime shuts
/// down.
pub struct NotificationSink {
    notifier: Option<Arc<dyn Notifier>>,
    tasks: Mutex<JoinSet<()>>,
}

impl NotificationSink {
    /// Creates a sink that shows notifications through `notifier`.
    #[must_use]
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier: Some(notifier),
            tasks: Mutex::new(JoinSet::new()),
        }
    }

    /// Creates a sink that only logs events.
    #[must_use]
    pub fn log_only() -> Self {
        Self {
            notifier: None,
            tasks: Mutex::new(JoinSet::new()),
        }
    }

    /// Returns true if notifications will be shown.
    #[must_use]
    pub fn notifications_enabled(&self) -> bool {
        self.notifier.is_some()
    }

    /// Waits up to `bound` for dispatched notifications to finish.
    ///
    /// Returns how many were still running when the bound elapsed; those are
    /// aborted.
    pub async fn flush(&self, bound: Duration) -> usize {
        let mut pending = std::mem::take(&mut *self.tasks());
        if pending.is_empty() {
            return 0;
        }

        debug!(pending = pending.len(), "waiting for notifications");
        let drained = tokio::time::timeout(bound, async {
            while pending.join_next().await.is_some() {}
        })
        .await;

        if drained.is_err() {
            warn!(
                dropped = pending.len(),
                bound_ms = bound.as_millis(),
                "Notifications still pending at shutdown, dropping them"
            );
        }
        let dropped = pending.len();
        pending.abort_all();
        dropped
    }

    fn tasks(&self) -> MutexGuard<'_, JoinSet<()>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EventSink for NotificationSink {
    fn emit(&self, event: LifecycleEvent) {
        let notification = event.notification();
        debug!(
            kind = %event.kind(),
            title = %notification.title,
            message = %notification.message,
            "lifecycle event"
        );

        let Some(notifier) = &self.notifier else {
            return;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(kind = %event.kind(), "no async runtime, notification dropped");
            return;
        };

        let notifier = Arc::clone(notifier);
        let mut tasks = self.tasks();
        while tasks.try_join_next().is_some() {}
        tasks.spawn_on(
            async move {
                if let Err(error) = notifier.notify(&notification).await {
                    warn!(error = %error, "Could not show notification");
                }
            },
            &runtime,
        );
    }
}

/// Forwards events over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<LifecycleEvent>,
}

impl ChannelSink {
    /// Creates a sink and the receiver its events arrive on.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<LifecycleEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: LifecycleEvent) {
        if self.tx.send(event).is_err() {
            trace!("event receiver dropped");
        }
    }
}

impl<S: EventSink + ?Sized> EventSink for Arc<S> {
    fn emit(&self, event: LifecycleEvent) {
        (**self).emit(event);
    }
}
