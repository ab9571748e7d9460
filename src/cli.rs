//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use tubewatch_core::config::DEFAULT_CONFIG_FILE;

/// Download YouTube videos as soon as their links are copied.
///
/// Tubewatch watches the clipboard and queues every new YouTube link
/// (videos, shorts, youtu.be links and playlists). Downloads run one at a
/// time, in the order the links were copied, through yt-dlp, which must
/// be on PATH (youtube-dl is not supported).
///
/// Exit codes: 0 = stopped with Ctrl+C, 1 = startup failed (for example
/// yt-dlp is not installed).
#[derive(Parser, Debug)]
#[command(name = "tubewatch")]
#[command(author, version, about)]
pub struct Args {
    /// Path to the JSON config file (created with defaults if missing)
    #[arg(default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored log output
    #[arg(long)]
    pub no_color: bool,
}
