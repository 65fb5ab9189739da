//! Execution result types.

use std::time::Duration;

/// Sentinel returned by [`ExecutionResult::exit_code`] when the command
/// was killed due to timeout and no real exit code exists.
///
/// Natural exit codes are `0..=255` and signal deaths are reported as
/// `128 + signal`, so this negative value cannot collide with either.
pub const TIMEOUT_EXIT_CODE: i32 = -2;

/// Outcome of one command invocation. Produced exactly once, after the
/// child has been reaped and the output drain has finished (or been
/// abandoned due to forced termination); immutable afterwards.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Combined stdout/stderr bytes (buffering mode only; empty when the
    /// output was streamed to a caller-supplied sink).
    pub output: Vec<u8>,
    /// The child's real exit code, or `None` when it was killed due to
    /// timeout.
    pub exit_code: Option<i32>,
    /// Whether the deadline fired and the child was forcibly terminated.
    /// Partial output captured before the kill is still delivered.
    pub timed_out: bool,
    /// Wall-clock time of the invocation.
    pub duration: Duration,
    /// First sink write error encountered while draining, if any. A drain
    /// error never aborts the run; it is surfaced here as a secondary
    /// detail.
    pub drain_error: Option<String>,
}

impl ExecutionResult {
    /// Exit code as a single integer: the real code, or
    /// [`TIMEOUT_EXIT_CODE`] when the command was killed by the deadline.
    pub fn exit_code(&self) -> i32 {
        self.exit_code.unwrap_or(TIMEOUT_EXIT_CODE)
    }

    /// Whether the command completed on its own with exit code 0.
    pub fn success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }

    /// Whether the command failed: nonzero exit or killed by the deadline.
    pub fn failed(&self) -> bool {
        !self.success()
    }

    /// Captured output decoded as UTF-8, lossily.
    pub fn output_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.output)
    }
}

impl Default for ExecutionResult {
    fn default() -> Self {
        Self {
            output: Vec::new(),
            exit_code: None,
            timed_out: false,
            duration: Duration::ZERO,
            drain_error: None,
        }
    }
}
