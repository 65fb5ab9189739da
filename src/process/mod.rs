//! Process spawning and termination.
//!
//! [`ProcessHandle`] wraps one live child process from spawn until it has
//! been waited on and reaped. Forced termination is platform-divergent and
//! lives in a compile-time selected submodule: signal-based process-group
//! kill on Unix, `taskkill` tree kill on Windows.

use std::process::Stdio;

use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tracing::debug;

use crate::error::RunCmdError;
use crate::execution::CommandSpec;
use crate::Result;

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

#[cfg(unix)]
use unix as platform;
#[cfg(windows)]
use windows as platform;

/// A spawned child process with its combined output pipes.
///
/// Holds the child from successful spawn until the engine splits it apart
/// for concurrent waiting, draining, and termination.
#[derive(Debug)]
pub struct ProcessHandle {
    child: Child,
    stdout: ChildStdout,
    stderr: ChildStderr,
    killer: ProcessKiller,
}

impl ProcessHandle {
    /// Spawn the command described by `spec`.
    ///
    /// stdout and stderr are piped (the combined output stream), stdin is
    /// closed. On Unix the child is placed in its own process group so that
    /// shell-spawned grandchildren are reachable for termination.
    pub fn spawn(spec: &CommandSpec) -> Result<Self> {
        let mut cmd = build_command(spec);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(unix)]
        cmd.process_group(0);

        if let Some(dir) = &spec.working_dir {
            cmd.current_dir(dir);
        }
        cmd.envs(&spec.env);

        let mut child = cmd.spawn().map_err(|source| RunCmdError::Spawn {
            command: spec.command_line.clone(),
            source,
        })?;

        let pid = child.id().unwrap_or(0);
        debug!(pid, command = %spec.command_line, "process spawned");

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| RunCmdError::Io(std::io::Error::other("child stdout not captured")))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| RunCmdError::Io(std::io::Error::other("child stderr not captured")))?;

        Ok(Self {
            child,
            stdout,
            stderr,
            killer: ProcessKiller { pid },
        })
    }

    /// Platform-native process identifier.
    pub fn pid(&self) -> u32 {
        self.killer.pid
    }

    /// A termination handle that does not borrow the child.
    pub fn killer(&self) -> ProcessKiller {
        self.killer.clone()
    }

    /// Wait for the child to exit naturally and return its real status.
    pub async fn wait(&mut self) -> std::io::Result<std::process::ExitStatus> {
        self.child.wait().await
    }

    /// Forcibly terminate the child and its descendants. See
    /// [`ProcessKiller::terminate`].
    pub async fn terminate(&self) {
        self.killer.terminate().await;
    }

    /// Split the handle into the pieces the engine runs concurrently:
    /// the child (for the wait task), both output pipes (for the pump
    /// tasks), and a killer (for the deadline path).
    pub fn split(self) -> (Child, ChildStdout, ChildStderr, ProcessKiller) {
        (self.child, self.stdout, self.stderr, self.killer)
    }
}

/// Termination handle for a spawned process and its descendants.
///
/// Holds only identifiers, never the child itself, so it can act while a
/// `wait()` is in flight. All operations are best-effort no-ops once the
/// process has exited.
#[derive(Debug, Clone)]
pub struct ProcessKiller {
    pid: u32,
}

impl ProcessKiller {
    /// Best-effort forced kill of the whole process tree.
    ///
    /// Unix: SIGTERM to the process group, a short grace window, then an
    /// unconditional SIGKILL to the group. Windows: `taskkill /T /F`.
    /// Safe to call repeatedly, concurrently with `wait()`, and after the
    /// process has already exited.
    pub async fn terminate(&self) {
        if self.pid == 0 {
            return;
        }
        platform::terminate_tree(self.pid).await;
    }
}

/// Map an exit status to a single integer code.
///
/// Natural exits report their code (0..=255). On Unix a signal death is
/// reported as `128 + signal`, the shell convention; keeping the natural
/// range non-negative means it can never collide with the negative timeout
/// sentinel.
pub fn exit_code_from(status: std::process::ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(sig) = status.signal() {
            return 128 + sig;
        }
    }
    -1
}

fn build_command(spec: &CommandSpec) -> Command {
    if spec.shell {
        return shell_command(&spec.command_line);
    }

    // No shell: whitespace-split the command line. Quoting is not
    // interpreted here; callers that need it use shell mode.
    let mut parts = spec.command_line.split_whitespace();
    let program = parts.next().unwrap_or("");
    let mut cmd = Command::new(program);
    cmd.args(parts);
    cmd
}

#[cfg(unix)]
fn shell_command(command_line: &str) -> Command {
    let mut cmd = Command::new("/bin/sh");
    cmd.arg("-c").arg(command_line);
    cmd
}

#[cfg(windows)]
fn shell_command(command_line: &str) -> Command {
    let mut cmd = Command::new("cmd.exe");
    cmd.arg("/C").arg(command_line);
    cmd
}
