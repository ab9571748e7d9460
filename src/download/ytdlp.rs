//! yt-dlp backed media downloader.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use super::{DownloadError, DownloadOptions, DownloadOutcome, MediaDownloader};
use crate::parser::Link;

/// Program names looked up on PATH.
///
/// `youtube-dl` is not accepted: it has no `--no-simulate` and no
/// `after_move:` print templates.
pub const TOOL_CANDIDATES: &[&str] = &["yt-dlp"];

/// Runs the `yt-dlp` executable once per link.
#[derive(Debug, Clone)]
pub struct YtDlp {
    program: PathBuf,
}

impl YtDlp {
    /// Finds `yt-dlp` on PATH.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::ToolNotFound`] when no candidate is on PATH.
    pub fn locate() -> Result<Self, DownloadError> {
        Self::locate_from(TOOL_CANDIDATES)
    }

    /// Finds the first of `candidates` on PATH.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::ToolNotFound`] when no candidate is on PATH.
    pub fn locate_from(candidates: &[&str]) -> Result<Self, DownloadError> {
        for candidate in candidates {
            if let Ok(path) = which::which(candidate) {
                debug!(program = %path.display(), "found download tool");
                return Ok(Self::with_program(path));
            }
        }
        Err(DownloadError::ToolNotFound {
            searched: candidates.join(", "),
        })
    }

    /// Uses an explicit executable.
    #[must_use]
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Path of the executable in use.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Runs `--version` to make sure the tool actually starts.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] if the tool cannot be run or reports failure.
    pub async fn version(&self) -> Result<String, DownloadError> {
        let output = crate::process::command(&self.program)
            .arg("--version")
            .output()
            .await
            .map_err(|source| self.spawn_error(source))?;

        if !output.status.success() {
            return Err(DownloadError::from_stderr(
                output.status.code(),
                &String::from_utf8_lossy(&output.stderr),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn spawn_error(&self, source: std::io::Error) -> DownloadError {
        DownloadError::Spawn {
            program: self.program.display().to_string(),
            source,
        }
    }
}

#[async_trait]
impl MediaDownloader for YtDlp {
    #[instrument(skip(self, options), fields(link = %link))]
    async fn download(
        &self,
        link: &Link,
        options: &DownloadOptions,
    ) -> Result<DownloadOutcome, DownloadError> {
        let mut command = crate::process::command(&self.program);
        command
            .args(options.to_args())
            .args([
                "--no-simulate",
                "--print",
                "after_move:title",
                "--print",
                "after_move:filepath",
                "--",
                link.as_str(),
            ])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        debug!(program = %self.program.display(), "spawning download tool");

        let output = command
            .output()
            .await
            .map_err(|source| self.spawn_error(source))?;

        if !output.status.success() {
            return Err(DownloadError::from_stderr(
                output.status.code(),
                &String::from_utf8_lossy(&output.stderr),
            ));
        }

        let outcome = parse_print_output(&String::from_utf8_lossy(&output.stdout)).ok_or_else(
            || DownloadError::MissingOutput {
                link: link.to_string(),
            },
        )?;
        info!(
            title = %outcome.title,
            path = %outcome.output_path.display(),
            items = outcome.item_count,
            "download tool finished"
        );
        Ok(outcome)
    }
}

/// Parses the `title` / `filepath` line pairs printed after each item is moved
/// into place. Playlists print one pair per entry; the first entry names the outcome.
fn parse_print_output(stdout: &str) -> Option<DownloadOutcome> {
    let lines: Vec<&str> = stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let mut pairs = lines.chunks_exact(2);
    let first = pairs.next()?;
    let item_count = 1 + pairs.count();

    Some(DownloadOutcome {
        title: first[0].to_string(),
        output_path: PathBuf::from(first[1]),
        item_count,
    })
}
