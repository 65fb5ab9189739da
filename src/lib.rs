//! # runcmd
//!
//! Run an external command with a hard wall-clock deadline.
//!
//! This crate provides spawn-and-wait semantics augmented with a timeout:
//! if the child does not finish within the deadline it is forcibly
//! terminated (process-group kill on Unix, tree kill on Windows) and the
//! caller is told via a `timed_out` flag instead of blocking forever. The
//! child's stdout and stderr are merged into one combined output stream,
//! delivered either as an in-memory buffer or streamed to a
//! caller-supplied sink.
//!
//! ## Features
//!
//! - **Hard deadline**: cancellable one-shot timer raced against natural exit
//! - **Process-group termination**: shell-spawned grandchildren are killed too
//! - **Two delivery modes**: buffered output, or streaming safe for unbounded volume
//! - **No zombies**: the child is always reaped (or abandoned, bounded) before return
//!
//! ## Quick Start
//!
//! ```no_run
//! use runcmd::{run, CommandSpec};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> runcmd::Result<()> {
//!     // Initialize logging
//!     runcmd::logging::try_init().ok();
//!
//!     let spec = CommandSpec::new("sleep 10")
//!         .shell(true)
//!         .timeout(Duration::from_secs(1));
//!
//!     let result = run(&spec).await?;
//!     if result.timed_out {
//!         println!("killed after {:?}", result.duration);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod execution;
pub mod logging;
pub mod process;
pub mod sink;
pub mod timer;

// Re-export commonly used types
pub use error::{Result, RunCmdError};
pub use execution::{run, run_streaming, CommandSpec, ExecutionResult, Executor, TIMEOUT_EXIT_CODE};
pub use process::{ProcessHandle, ProcessKiller};
pub use sink::{BufferSink, OutputSink, WriterSink};
pub use timer::{CancelHandle, DeadlineTimer, Expiry};
