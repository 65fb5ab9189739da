//! Windows termination: forced tree kill via `taskkill`.

use std::process::Stdio;

use tracing::{debug, warn};

/// Terminate `pid` and its whole process tree.
///
/// `taskkill /T /F` addresses descendants that a `cmd.exe` intermediary
/// may have spawned. Failures (process already gone, taskkill missing)
/// are swallowed: terminating an exited process is a documented no-op.
pub(super) async fn terminate_tree(pid: u32) {
    debug!(pid, "invoking taskkill on process tree");

    let result = tokio::process::Command::new("taskkill")
        .args(["/PID", &pid.to_string(), "/T", "/F"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;

    if let Err(e) = result {
        warn!(pid, error = %e, "taskkill could not be invoked");
    }
}
