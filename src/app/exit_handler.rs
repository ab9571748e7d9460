//! Exit code logic for the tubewatch process.
//!
//! Single responsibility: map the runtime outcome to the process exit code.

use std::process::ExitCode;

use anyhow::Result;

use crate::ProcessExit;

/// Numeric exit code for an outcome.
pub(crate) fn exit_code_value(exit: ProcessExit) -> u8 {
    match exit {
        ProcessExit::Success => 0,
        ProcessExit::Failure => 1,
    }
}

/// Reports a fatal error (if any) and returns the outcome it maps to.
pub(crate) fn determine_exit_outcome(result: Result<ProcessExit>) -> ProcessExit {
    match result {
        Ok(exit) => exit,
        Err(error) => {
            tracing::error!(error = %format!("{error:#}"), "Fatal error");
            eprintln!("Error: {error:#}");
            ProcessExit::Failure
        }
    }
}

/// Process exit code for the runtime result.
pub(crate) fn determine_exit_code(result: Result<ProcessExit>) -> ExitCode {
    ExitCode::from(exit_code_value(determine_exit_outcome(result)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_success_is_zero() {
        assert_eq!(exit_code_value(ProcessExit::Success), 0);
    }

    #[test]
    fn test_exit_code_failure_is_one() {
        assert_eq!(exit_code_value(ProcessExit::Failure), 1);
    }

    #[test]
    fn test_error_result_maps_to_failure() {
        let exit = determine_exit_outcome(Err(anyhow::anyhow!("no download directory")));
        assert_eq!(exit, ProcessExit::Failure);
    }

    #[test]
    fn test_ok_result_keeps_outcome() {
        assert_eq!(
            determine_exit_outcome(Ok(ProcessExit::Failure)),
            ProcessExit::Failure
        );
        assert_eq!(
            determine_exit_outcome(Ok(ProcessExit::Success)),
            ProcessExit::Success
        );
    }
}
