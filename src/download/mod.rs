//! Media download collaborator.
//!
//! The pipeline treats downloading as an opaque, long-running operation:
//! [`MediaDownloader::download`] takes a link plus the fixed
//! [`DownloadOptions`] and returns the title and output path, or an error.
//! Network-level retries are the tool's business, configured through the
//! options; the pipeline never retries a whole item.
//!
//! # Example
//!
//! ```no_run
//! use tubewatch_core::config::AppConfig;
//! use tubewatch_core::download::{DownloadOptions, MediaDownloader, YtDlp};
//! use tubewatch_core::parser::match_link;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let tool = YtDlp::locate()?;
//! let options = DownloadOptions::from_config(&AppConfig::default());
//! let link = match_link("https://youtu.be/dQw4w9WgXcQ").unwrap();
//! let outcome = tool.download(&link, &options).await?;
//! println!("Downloaded: {}", outcome.title);
//! # Ok(())
//! # }
//! ```

mod error;
mod options;
mod ytdlp;

pub use error::DownloadError;
pub use options::{
    DEFAULT_FRAGMENT_RETRIES, DEFAULT_RECODE_FORMAT, DEFAULT_RETRIES, DownloadOptions,
};
pub use ytdlp::{TOOL_CANDIDATES, YtDlp};

use std::path::PathBuf;

use async_trait::async_trait;

use crate::parser::Link;

/// Result of a successful download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    /// Title of the (first) downloaded item.
    pub title: String,
    /// Final path of the (first) downloaded file.
    pub output_path: PathBuf,
    /// Number of items downloaded; greater than one for playlists.
    pub item_count: usize,
}

/// Downloads one link to completion.
#[async_trait]
pub trait MediaDownloader: Send + Sync {
    /// Downloads `link` with `options`.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] for any failure; the caller does not retry.
    async fn download(
        &self,
        link: &Link,
        options: &DownloadOptions,
    ) -> Result<DownloadOutcome, DownloadError>;
}
