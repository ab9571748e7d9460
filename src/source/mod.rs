//! Shared text buffer sources polled for links.
//!
//! A [`BufferSource`] returns the current buffer content on demand. "No
//! content" is an empty string, never an error; errors are reserved for
//! failures to read at all.

mod clipboard;

pub use clipboard::ClipboardSource;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while reading a buffer.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The system clipboard could not be opened or read.
    #[error("could not read clipboard: {0}")]
    Clipboard(#[from] arboard::Error),

    /// The blocking read task panicked or was cancelled.
    #[error("clipboard read task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// A poll-based text buffer.
#[async_trait]
pub trait BufferSource: Send + Sync {
    /// Returns the current buffer content (empty string when there is none).
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the buffer could not be read.
    async fn read(&self) -> Result<String, SourceError>;
}

#[async_trait]
impl<S: BufferSource + ?Sized> BufferSource for std::sync::Arc<S> {
    async fn read(&self) -> Result<String, SourceError> {
        (**self).read().await
    }
}
