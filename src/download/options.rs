//! Fixed download configuration passed to the download tool.

use std::ffi::OsString;
use std::path::PathBuf;

use crate::config::AppConfig;

/// Whole-item retries performed inside the tool.
pub const DEFAULT_RETRIES: u32 = 10;

/// Per-fragment retries performed inside the tool.
pub const DEFAULT_FRAGMENT_RETRIES: u32 = 10;

/// Container every finished download is converted to.
pub const DEFAULT_RECODE_FORMAT: &str = "mp4";

/// Options handed unchanged to the download tool for every link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOptions {
    /// Format selection expression.
    pub format: String,
    /// Full output template (directory joined with the filename template).
    pub output_template: PathBuf,
    /// Container used when merging separate audio/video streams.
    pub merge_output_format: String,
    pub retries: u32,
    pub fragment_retries: u32,
    /// Resume partially downloaded files.
    pub continue_partial: bool,
    /// Skip TLS certificate verification.
    pub no_check_certificate: bool,
    /// Keep the server's modification time on the file.
    pub preserve_mtime: bool,
    /// Post-processing: convert the final file to this container.
    pub recode_format: Option<String>,
}

impl DownloadOptions {
    /// Builds the fixed option set from user configuration.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            format: config.video_format.clone(),
            output_template: config.download_path.join(&config.filename_template),
            merge_output_format: config.merge_output_format.clone(),
            retries: DEFAULT_RETRIES,
            fragment_retries: DEFAULT_FRAGMENT_RETRIES,
            continue_partial: true,
            no_check_certificate: true,
            preserve_mtime: false,
            recode_format: Some(DEFAULT_RECODE_FORMAT.to_string()),
        }
    }

    /// Renders the options as yt-dlp command-line arguments.
    #[must_use]
    pub fn to_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--format".into(),
            self.format.clone().into(),
            "--output".into(),
            self.output_template.clone().into_os_string(),
            "--merge-output-format".into(),
            self.merge_output_format.clone().into(),
            "--retries".into(),
            self.retries.to_string().into(),
            "--fragment-retries".into(),
            self.fragment_retries.to_string().into(),
        ];
        if self.continue_partial {
            args.push("--continue".into());
        }
        if self.no_check_certificate {
            args.push("--no-check-certificates".into());
        }
        if !self.preserve_mtime {
            args.push("--no-mtime".into());
        }
        if let Some(format) = &self.recode_format {
            args.push("--recode-video".into());
            args.push(format.clone().into());
        }
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> DownloadOptions {
        let config = AppConfig {
            download_path: PathBuf::from("/media/videos"),
            ..AppConfig::default()
        };
        DownloadOptions::from_config(&config)
    }

    #[test]
    fn test_from_config_joins_output_template() {
        let options = options();
        assert_eq!(
            options.output_template,
            PathBuf::from("/media/videos/%(title)s-%(id)s.%(ext)s")
        );
        assert_eq!(options.retries, 10);
        assert_eq!(options.fragment_retries, 10);
        assert!(options.no_check_certificate);
    }

    #[test]
    fn test_to_args_contains_fixed_robustness_flags() {
        let args: Vec<String> = options()
            .to_args()
            .into_iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();

        let pair = |flag: &str| {
            args.iter()
                .position(|arg| arg == flag)
                .and_then(|pos| args.get(pos + 1))
                .cloned()
        };
        assert_eq!(pair("--format").as_deref(), Some(crate::config::DEFAULT_VIDEO_FORMAT));
        assert_eq!(pair("--merge-output-format").as_deref(), Some("mp4"));
        assert_eq!(pair("--fragment-retries").as_deref(), Some("10"));
        assert_eq!(pair("--recode-video").as_deref(), Some("mp4"));
        assert!(args.iter().any(|arg| arg == "--no-check-certificates"));
        assert!(args.iter().any(|arg| arg == "--continue"));
        assert!(args.iter().any(|arg| arg == "--no-mtime"));
    }

    #[test]
    fn test_to_args_without_recode() {
        let options = DownloadOptions {
            recode_format: None,
            ..options()
        };
        let args = options.to_args();
        assert!(!args.iter().any(|arg| arg == "--recode-video"));
    }
}
