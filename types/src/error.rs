//! Typed failure taxonomy for edits and process execution.

use std::time::Duration;

use thiserror::Error;

/// Everything that can go wrong while materializing an edit.
///
/// The edit controller converts each of these into a human-readable
/// `EditResult::Error`; the `Display` strings here are the user-visible
/// messages.
#[derive(Debug, Error)]
pub enum EditError {
    #[error("Project directory not found")]
    ProjectNotFound,
    #[error("File not found: {path}")]
    FileNotFound { path: String },
    #[error("Failed to apply edit to {path}: {cause}")]
    ReadFailure { path: String, cause: String },
    #[error("Failed to apply edit to {path}: {cause}")]
    MergeFailure { path: String, cause: String },
    #[error("Failed to write file: {cause}")]
    WriteFailure { cause: String },
    #[error("No changes detected in {path}")]
    NoChangesDetected { path: String },
    #[error("Could not parse edit request")]
    ParseFailure,
}

/// Failures of the shell process executor.
///
/// A process that ran to completion is never an error; its exit code is
/// reported in the result. These cover the paths where no trustworthy
/// result exists.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("Failed to launch process: {cause}")]
    Launch { cause: String },
    #[error("Command timed out after {timeout:?}")]
    Timeout { timeout: Duration },
    #[error("Process stream error: {cause}")]
    Stream { cause: String },
}
