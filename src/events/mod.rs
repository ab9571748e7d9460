//! Lifecycle events emitted by the pipeline.
//!
//! Every user-visible state transition (a link was queued, a download
//! started, finished or failed, monitoring started or stopped) is described
//! by a [`LifecycleEvent`] and handed to an [`EventSink`] exactly once.
//! Events are not stored or replayed.
//!
//! Sinks:
//! - [`NotificationSink`] - logs the event and shows a desktop notification
//! - [`ChannelSink`] - forwards events over a tokio channel

mod notify;
mod sink;

pub use notify::{DesktopNotifier, Notifier, NotifyError};
pub use sink::{ChannelSink, EventSink, NotificationSink};

use std::fmt;
use std::time::Duration;

use crate::parser::Link;

/// Maximum characters of a video title shown in a notification.
pub const TITLE_DISPLAY_CHARS: usize = 50;

/// Maximum characters of an error message carried by a `Failed` event.
pub const ERROR_MESSAGE_CHARS: usize = 100;

/// Maximum characters of the in-flight link shown in a notification.
pub const CURRENT_LINK_DISPLAY_CHARS: usize = 50;

const SHORT_TIMEOUT: Duration = Duration::from_secs(5);
const LONG_TIMEOUT: Duration = Duration::from_secs(10);

/// Discriminant of a [`LifecycleEvent`], used for logging and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Monitoring,
    Enqueued,
    Started,
    Completed,
    Failed,
    Stopped,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Monitoring => "monitoring",
            Self::Enqueued => "enqueued",
            Self::Started => "started",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Stopped => "stopped",
        };
        f.write_str(label)
    }
}

/// A pipeline state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The poller started watching the clipboard.
    Monitoring,
    /// A new link was accepted into the queue.
    Enqueued {
        link: Link,
        /// Queue depth right after the push.
        depth: usize,
        /// Link being downloaded at that moment, if any.
        current: Option<Link>,
    },
    /// The worker began downloading a link.
    Started {
        link: Link,
        /// Links still waiting behind this one.
        remaining: usize,
    },
    /// A download finished successfully.
    Completed {
        link: Link,
        title: String,
        remaining: usize,
    },
    /// A download failed. The link is not retried.
    Failed {
        link: Link,
        /// Error message, already truncated to [`ERROR_MESSAGE_CHARS`].
        error: String,
    },
    /// The poller stopped watching the clipboard.
    Stopped,
}

/// Rendered text of a desktop notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    /// How long the notification should stay visible. A hint only.
    pub timeout: Duration,
}

impl Notification {
    fn new(title: &str, message: String, timeout: Duration) -> Self {
        Self {
            title: title.to_string(),
            message,
            timeout,
        }
    }
}

impl LifecycleEvent {
    /// Returns the event discriminant.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Monitoring => EventKind::Monitoring,
            Self::Enqueued { .. } => EventKind::Enqueued,
            Self::Started { .. } => EventKind::Started,
            Self::Completed { .. } => EventKind::Completed,
            Self::Failed { .. } => EventKind::Failed,
            Self::Stopped => EventKind::Stopped,
        }
    }

    /// Returns the link the event is about, if any.
    #[must_use]
    pub fn link(&self) -> Option<&Link> {
        match self {
            Self::Enqueued { link, .. }
            | Self::Started { link, .. }
            | Self::Completed { link, .. }
            | Self::Failed { link, .. } => Some(link),
            Self::Monitoring | Self::Stopped => None,
        }
    }

    /// Renders the user-facing notification for this event.
    #[must_use]
    pub fn notification(&self) -> Notification {
        match self {
            Self::Monitoring => Notification::new(
                "Auto-Downloader Started",
                "Monitoring clipboard for YouTube links".to_string(),
                SHORT_TIMEOUT,
            ),
            Self::Enqueued {
                depth, current: None, ..
            } if *depth == 1 => Notification::new(
                "Added to Queue",
                format!("Download will start shortly...\nQueue: {depth} video(s)"),
                SHORT_TIMEOUT,
            ),
            Self::Enqueued { depth, current, .. } => {
                let current = current.as_ref().map_or_else(
                    || "Starting...".to_string(),
                    |link| abbreviate(link.as_str(), CURRENT_LINK_DISPLAY_CHARS),
                );
                Notification::new(
                    "Added to Queue",
                    format!("Position in queue: {depth}\nCurrent: {current}"),
                    SHORT_TIMEOUT,
                )
            }
            Self::Started { remaining, .. } => Notification::new(
                "Download Started",
                format!("Downloading...\nRemaining in queue: {remaining}"),
                SHORT_TIMEOUT,
            ),
            Self::Completed {
                title, remaining, ..
            } => {
                let title = truncate_chars(title, TITLE_DISPLAY_CHARS);
                let message = if *remaining > 0 {
                    format!("{title}\nNext in queue: {remaining} video(s)")
                } else {
                    format!("{title}\nQueue is empty")
                };
                Notification::new("Download Complete! ✓", message, LONG_TIMEOUT)
            }
            Self::Failed { error, .. } => Notification::new(
                "Download Failed ✗",
                format!("Error: {error}"),
                LONG_TIMEOUT,
            ),
            Self::Stopped => Notification::new(
                "Auto-Downloader Stopped",
                "Clipboard monitoring stopped".to_string(),
                SHORT_TIMEOUT,
            ),
        }
    }
}

/// Keeps at most `max` characters.
#[must_use]
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Keeps at most `max` characters, marking a cut with `...`.
#[must_use]
pub fn abbreviate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        format!("{}...", truncate_chars(text, max))
    }
}
