//! Command execution engine.
//!
//! This module provides spawn-and-wait execution with a hard deadline:
//! - Buffering and streaming output delivery
//! - Wall-clock timeout with forced termination
//! - Combined stdout/stderr capture
//!
//! # Example
//!
//! ```no_run
//! use runcmd::{run, CommandSpec};
//! use std::time::Duration;
//!
//! # async fn example() -> runcmd::Result<()> {
//! let spec = CommandSpec::new("echo Hello World")
//!     .shell(true)
//!     .timeout(Duration::from_secs(5));
//! let result = run(&spec).await?;
//! assert!(result.success());
//! assert_eq!(result.output, b"Hello World\n");
//! # Ok(())
//! # }
//! ```

mod command;
mod executor;
mod result;

pub use command::CommandSpec;
pub use executor::{run, run_streaming, Executor};
pub use result::{ExecutionResult, TIMEOUT_EXIT_CODE};
