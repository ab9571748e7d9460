//! System clipboard reader backed by `arboard`.

use async_trait::async_trait;
use tracing::trace;

use super::{BufferSource, SourceError};

/// Reads the system clipboard as text.
///
/// Each read opens a clipboard handle on a blocking thread, since a read may
/// wait on the display server. A clipboard holding no text (empty, or an
/// image) reads as an empty string.
#[derive(Debug, Clone, Copy)]
pub struct ClipboardSource {
    _private: (),
}

impl ClipboardSource {
    /// Opens the system clipboard once to make sure it is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Clipboard`] when there is no usable clipboard,
    /// for example without a display server.
    pub fn open() -> Result<Self, SourceError> {
        arboard::Clipboard::new()?;
        Ok(Self { _private: () })
    }
}

#[async_trait]
impl BufferSource for ClipboardSource {
    async fn read(&self) -> Result<String, SourceError> {
        let result = tokio::task::spawn_blocking(|| {
            let mut clipboard = arboard::Clipboard::new()?;
            clipboard.get_text()
        })
        .await?;
        text_or_empty(result)
    }
}

/// Maps "no text on the clipboard" to empty content.
fn text_or_empty(result: Result<String, arboard::Error>) -> Result<String, SourceError> {
    match result {
        Ok(text) => Ok(text),
        Err(arboard::Error::ContentNotAvailable) => {
            trace!("clipboard holds no text");
            Ok(String::new())
        }
        Err(error) => Err(error.into()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_text_or_empty_passes_text_through() {
        let text = text_or_empty(Ok("https://youtu.be/abc".to_string())).unwrap();
        assert_eq!(text, "https://youtu.be/abc");
    }

    #[test]
    fn test_text_or_empty_content_not_available_is_empty() {
        let text = text_or_empty(Err(arboard::Error::ContentNotAvailable)).unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn test_text_or_empty_other_errors_are_read_failures() {
        let err = text_or_empty(Err(arboard::Error::ClipboardOccupied)).unwrap_err();
        assert!(matches!(err, SourceError::Clipboard(arboard::Error::ClipboardOccupied)));
        assert!(err.to_string().starts_with("could not read clipboard"));
    }

    #[test]
    fn test_text_or_empty_unsupported_clipboard_is_read_failure() {
        let err = text_or_empty(Err(arboard::Error::ClipboardNotSupported)).unwrap_err();
        assert!(matches!(err, SourceError::Clipboard(_)));
    }
}
