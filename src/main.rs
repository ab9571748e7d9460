//! CLI entry point for tubewatch.

use std::process::ExitCode;

mod app;
mod cli;

/// How the process ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProcessExit {
    /// Stopped by the user.
    Success,
    /// A startup precondition failed.
    Failure,
}

#[tokio::main]
async fn main() -> ExitCode {
    let result = app::runtime::run_tubewatch().await;
    app::exit_handler::determine_exit_code(result)
}
