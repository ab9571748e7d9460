//! The clipboard-to-download pipeline.
//!
//! Two tasks share one [`Coordinator`]:
//!
//! - [`SourcePoller`] samples the clipboard, extracts links and submits new
//!   ones. It never waits on a download.
//! - The worker started by [`spawn_worker`] takes links off the queue one
//!   at a time and runs them through a [`MediaDownloader`](crate::download::MediaDownloader).
//!
//! Every link is queued at most once per process lifetime, downloads run
//! strictly in FIFO order, and a failed item is reported and skipped.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use tubewatch_core::config::AppConfig;
//! use tubewatch_core::download::{DownloadOptions, YtDlp};
//! use tubewatch_core::events::NotificationSink;
//! use tubewatch_core::pipeline::{Coordinator, SourcePoller, spawn_worker};
//! use tubewatch_core::source::ClipboardSource;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! let coordinator = Arc::new(Coordinator::new(Arc::new(NotificationSink::log_only())));
//! let worker = spawn_worker(
//!     Arc::clone(&coordinator),
//!     Arc::new(YtDlp::locate()?),
//!     DownloadOptions::from_config(&config),
//! );
//!
//! let mut poller = SourcePoller::new(
//!     ClipboardSource::open()?,
//!     Arc::clone(&coordinator),
//!     config.poll_interval(),
//! );
//! poller.run(async { tokio::signal::ctrl_c().await.unwrap_or(()) }).await;
//! worker.abandon();
//! # Ok(())
//! # }
//! ```

mod coordinator;
mod poller;
mod worker;

pub use coordinator::{Coordinator, CurrentDownload, SubmitOutcome};
pub use poller::{SourcePoller, TickOutcome};
pub use worker::{WorkerHandle, WorkerState, WorkerStats, spawn_worker};
