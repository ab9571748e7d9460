//! Tubewatch Core Library
//!
//! Watches the system clipboard for YouTube links and downloads each new
//! link exactly once, strictly one at a time, reporting progress as
//! lifecycle events.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`parser`] - Link type and the YouTube link matcher
//! - [`queue`] - Dedup ledger and the FIFO work queue
//! - [`source`] - Clipboard (shared text buffer) readers
//! - [`download`] - Download collaborator trait and the yt-dlp backend
//! - [`events`] - Lifecycle events, notification rendering and sinks
//! - [`pipeline`] - Source poller, sequential worker and their shared state
//! - [`config`] - JSON configuration file handling

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod download;
pub mod events;
pub mod parser;
pub mod pipeline;
pub(crate) mod process;
pub mod queue;
pub mod source;

// Re-export commonly used types
pub use config::{AppConfig, ConfigError, LoadedConfig, load_or_create};
pub use download::{DownloadError, DownloadOptions, DownloadOutcome, MediaDownloader, YtDlp};
pub use events::{
    ChannelSink, DesktopNotifier, EventKind, EventSink, LifecycleEvent, NotificationSink,
    Notifier,
};
pub use parser::{Link, match_link};
pub use pipeline::{
    Coordinator, SourcePoller, SubmitOutcome, WorkerHandle, WorkerState, spawn_worker,
};
pub use queue::{DedupLedger, QueueEntry, WorkQueue};
pub use source::{BufferSource, ClipboardSource, SourceError};
