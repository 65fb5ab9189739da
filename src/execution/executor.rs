//! Command execution engine.
//!
//! One invocation runs four concurrent pieces: a wait task owning the
//! child, two pump tasks draining the output pipes into a single channel
//! (the combined output stream), and an optional deadline timer. The
//! engine races "child exited" against "deadline fired", first observed
//! wins, and always reaps the child and winds the drain down before
//! producing the result.

use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::command::CommandSpec;
use super::result::ExecutionResult;
use crate::error::RunCmdError;
use crate::process::{exit_code_from, ProcessHandle};
use crate::sink::{BufferSink, OutputSink};
use crate::timer::DeadlineTimer;
use crate::Result;

/// Buffer size for reading the child's output pipes.
const READ_BUFFER_SIZE: usize = 8192;

/// Chunk channel capacity; backpressure beyond this throttles the pumps,
/// never the child directly.
const CHANNEL_CAPACITY: usize = 32;

/// Default bound on reaping a child after forced termination. An
/// unkillable process is abandoned after this, not waited on forever.
const DEFAULT_REAP_TIMEOUT: Duration = Duration::from_secs(5);

/// Default bound on each idle gap while flushing output after exit.
/// Covers the case of a surviving grandchild holding the pipe open.
const DEFAULT_DRAIN_LINGER: Duration = Duration::from_millis(500);

/// Executes commands against their deadline.
///
/// Holds only tunables; every invocation owns its process, timer, and
/// drain state exclusively, so independent invocations never interfere.
#[derive(Debug, Clone)]
pub struct Executor {
    reap_timeout: Duration,
    drain_linger: Duration,
    kill_on_interrupt: bool,
}

impl Default for Executor {
    fn default() -> Self {
        Self {
            reap_timeout: DEFAULT_REAP_TIMEOUT,
            drain_linger: DEFAULT_DRAIN_LINGER,
            kill_on_interrupt: false,
        }
    }
}

impl Executor {
    /// Create an executor with default tunables.
    pub fn new() -> Self {
        Self::default()
    }

    /// How long to wait for the child to be reaped after forced
    /// termination before giving up on it.
    pub fn reap_timeout(mut self, duration: Duration) -> Self {
        self.reap_timeout = duration;
        self
    }

    /// How long an idle gap in the post-exit output flush may last before
    /// the drain is abandoned.
    pub fn drain_linger(mut self, duration: Duration) -> Self {
        self.drain_linger = duration;
        self
    }

    /// Terminate the child's process tree when this process receives
    /// Ctrl-C, then resolve to [`RunCmdError::Interrupted`].
    ///
    /// Off by default: the child runs in its own process group, so the
    /// terminal's SIGINT does not reach it, and library callers usually
    /// own their signal handling. The CLI turns this on so an interrupted
    /// wrapper never leaves an orphaned child behind.
    pub fn kill_on_interrupt(mut self, enabled: bool) -> Self {
        self.kill_on_interrupt = enabled;
        self
    }

    /// Run the command, buffering its combined output in memory.
    ///
    /// The accumulated bytes are returned in
    /// [`ExecutionResult::output`]. For output of unbounded size use
    /// [`execute_streaming`](Self::execute_streaming) instead.
    pub async fn execute(&self, spec: &CommandSpec) -> Result<ExecutionResult> {
        let mut sink = BufferSink::new();
        let mut result = self.execute_streaming(spec, &mut sink).await?;
        result.output = sink.into_bytes();
        Ok(result)
    }

    /// Run the command, streaming its combined output to `sink` as it
    /// arrives.
    ///
    /// The engine never buffers the full stream, so this mode is safe for
    /// arbitrarily large output. The sink is written to but never closed;
    /// on timeout, everything delivered before the kill stays delivered.
    pub async fn execute_streaming<S: OutputSink>(
        &self,
        spec: &CommandSpec,
        sink: &mut S,
    ) -> Result<ExecutionResult> {
        spec.validate()?;

        let start = Instant::now();
        let handle = ProcessHandle::spawn(spec)?;
        let pid = handle.pid();
        let (mut child, stdout, stderr, killer) = handle.split();

        let (tx, mut rx) = mpsc::channel::<Vec<u8>>(CHANNEL_CAPACITY);
        let out_pump = tokio::spawn(pump(stdout, tx.clone()));
        let err_pump = tokio::spawn(pump(stderr, tx));

        let (mut expiry, mut deadline) = DeadlineTimer::start(spec.timeout);
        let mut wait_task = tokio::spawn(async move { child.wait().await });

        // Stays pending forever unless interrupt handling is enabled; an
        // installation failure degrades to the same never-firing future.
        let kill_on_interrupt = self.kill_on_interrupt;
        let mut interrupt = std::pin::pin!(async move {
            if !kill_on_interrupt {
                std::future::pending::<()>().await;
            }
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
        });

        let mut exit_code: Option<i32> = None;
        let mut timed_out = false;
        let mut interrupted = false;
        let mut drained = false;
        let mut drain_error: Option<String> = None;
        let mut wait_done = false;

        while !wait_done {
            tokio::select! {
                chunk = rx.recv(), if !drained => match chunk {
                    Some(bytes) => deliver(sink, &bytes, &mut drain_error),
                    None => drained = true,
                },
                res = &mut wait_task => {
                    wait_done = true;
                    // Cancel before the run can resolve to Completed, so a
                    // stale expiry can never race a later invocation.
                    deadline.cancel();
                    let status = res.map_err(|e| RunCmdError::Io(std::io::Error::other(e)))??;
                    exit_code = Some(exit_code_from(status));
                    debug!(pid, code = exit_code, "process exited");
                },
                _ = &mut expiry, if !timed_out => {
                    timed_out = true;
                    info!(pid, command = %spec.command_line, "deadline expired, terminating");
                    killer.terminate().await;
                    // Reap to avoid a zombie, but bounded: an unkillable
                    // process must not hang the caller forever.
                    match tokio::time::timeout(self.reap_timeout, &mut wait_task).await {
                        Ok(res) => {
                            // Exit status here reflects our kill signal,
                            // not the command; the sentinel stands in.
                            let _ = res;
                        }
                        Err(_) => {
                            warn!(pid, "process survived forced termination, abandoning");
                            wait_task.abort();
                        }
                    }
                    wait_done = true;
                },
                _ = &mut interrupt, if !interrupted => {
                    interrupted = true;
                    info!(pid, command = %spec.command_line, "interrupted, terminating");
                    deadline.cancel();
                    killer.terminate().await;
                    if tokio::time::timeout(self.reap_timeout, &mut wait_task).await.is_err() {
                        warn!(pid, "process survived forced termination, abandoning");
                        wait_task.abort();
                    }
                    wait_done = true;
                },
            }
        }

        if interrupted {
            drop(rx);
            out_pump.abort();
            err_pump.abort();
            return Err(RunCmdError::Interrupted(spec.command_line.clone()));
        }

        // Flush what the pumps still hold. After a normal exit this ends
        // at EOF almost immediately; the linger bound keeps a surviving
        // grandchild that inherited the pipe from hanging the invocation.
        while !drained {
            match tokio::time::timeout(self.drain_linger, rx.recv()).await {
                Ok(Some(bytes)) => deliver(sink, &bytes, &mut drain_error),
                Ok(None) => drained = true,
                Err(_) => {
                    debug!(pid, "output stream still open after exit, abandoning drain");
                    break;
                }
            }
        }
        drop(rx);
        out_pump.abort();
        err_pump.abort();

        Ok(ExecutionResult {
            output: Vec::new(),
            exit_code,
            timed_out,
            duration: start.elapsed(),
            drain_error,
        })
    }
}

/// Run a command and return its result with the combined output buffered
/// in memory.
pub async fn run(spec: &CommandSpec) -> Result<ExecutionResult> {
    Executor::new().execute(spec).await
}

/// Run a command, streaming its combined output to a caller-supplied sink.
pub async fn run_streaming<S: OutputSink>(
    spec: &CommandSpec,
    sink: &mut S,
) -> Result<ExecutionResult> {
    Executor::new().execute_streaming(spec, sink).await
}

/// Forward a chunk to the sink. A write failure is recorded once and
/// further chunks are discarded; the drain keeps consuming so the child
/// never blocks on a full pipe.
fn deliver<S: OutputSink>(sink: &mut S, bytes: &[u8], drain_error: &mut Option<String>) {
    if drain_error.is_some() {
        return;
    }
    if let Err(e) = sink.write(bytes) {
        warn!(error = %e, "sink write failed, discarding further output");
        *drain_error = Some(e.to_string());
    }
}

/// Read one pipe to EOF, forwarding chunks into the combined channel.
async fn pump<R: AsyncRead + Unpin>(mut reader: R, tx: mpsc::Sender<Vec<u8>>) {
    let mut buf = [0u8; READ_BUFFER_SIZE];
    loop {
        match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                // Receiver gone means the drain was abandoned; stop quietly.
                if tx.send(buf[..n].to_vec()).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                warn!(error = %e, "error reading child output stream");
                break;
            }
        }
    }
}
