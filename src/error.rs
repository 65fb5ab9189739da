//! Error types for runcmd.

use thiserror::Error;

/// Main error type for runcmd operations.
///
/// A timed-out command is deliberately *not* an error: it resolves to a
/// normal [`ExecutionResult`](crate::ExecutionResult) with `timed_out` set,
/// carrying whatever output was captured before termination.
#[derive(Error, Debug)]
pub enum RunCmdError {
    /// The command specification was rejected before anything was spawned.
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// The executable could not be found or started.
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The run was cut short by Ctrl-C. The child and its descendants
    /// have already been terminated; captured output is discarded.
    #[error("interrupted while running `{0}`")]
    Interrupted(String),

    /// I/O error while waiting on or draining the child process.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for runcmd operations.
pub type Result<T> = std::result::Result<T, RunCmdError>;
