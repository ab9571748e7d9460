//! Error types for the download module.

use thiserror::Error;

/// Errors that can occur while locating or running the download tool.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// None of the supported tools is on PATH. Fatal at startup.
    #[error("no download tool found on PATH (looked for: {searched})\n  Suggestion: install yt-dlp (https://github.com/yt-dlp/yt-dlp)")]
    ToolNotFound {
        /// Comma-separated list of program names tried.
        searched: String,
    },

    /// The tool could not be started.
    #[error("could not run {program}: {source}")]
    Spawn {
        /// Program path as displayed.
        program: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The tool ran and reported a failure (network, extraction, unavailable video, ...).
    #[error("{message}")]
    Failed {
        /// Exit code, if the process exited normally.
        code: Option<i32>,
        /// Most relevant line of the tool's error output.
        message: String,
    },

    /// The tool exited successfully but did not report what it downloaded.
    #[error("download finished but the tool reported no output file for {link}")]
    MissingOutput {
        /// The link that was downloaded.
        link: String,
    },
}

impl DownloadError {
    /// Creates a `Failed` error from an exit code and raw stderr.
    #[must_use]
    pub fn from_stderr(code: Option<i32>, stderr: &str) -> Self {
        let message = summarize_stderr(stderr).unwrap_or_else(|| match code {
            Some(code) => format!("download tool exited with code {code}"),
            None => "download tool was terminated by a signal".to_string(),
        });
        Self::Failed { code, message }
    }
}

/// Picks the line that explains the failure.
///
/// Prefers the last `ERROR:` line (with the prefix removed), otherwise the
/// last non-empty line.
fn summarize_stderr(stderr: &str) -> Option<String> {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    lines
        .iter()
        .rev()
        .find_map(|line| line.strip_prefix("ERROR:"))
        .map(|line| line.trim().to_string())
        .or_else(|| lines.last().map(|line| (*line).to_string()))
}
