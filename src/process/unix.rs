//! Unix termination: signal the whole process group.
//!
//! The child is spawned with `process_group(0)`, so its pgid equals its
//! pid and `killpg` reaches every descendant an intermediate shell may
//! have spawned.

use std::time::Duration;

use tracing::debug;

/// Grace window between SIGTERM and the SIGKILL escalation.
const GRACE_PERIOD: Duration = Duration::from_millis(500);

/// Terminate the process group rooted at `pid`.
///
/// SIGTERM first so well-behaved processes can clean up, then SIGKILL
/// unconditionally after the grace window. Signal errors (ESRCH when the
/// group is already gone, EPERM) are swallowed: terminating an exited
/// process is a documented no-op.
pub(super) async fn terminate_tree(pid: u32) {
    let pgid = pid as libc::pid_t;
    debug!(pid, "sending SIGTERM to process group");

    // SAFETY: killpg with a valid signal number has no memory-safety
    // concerns; a stale pgid yields ESRCH which we ignore.
    let rc = unsafe { libc::killpg(pgid, libc::SIGTERM) };
    if rc != 0 {
        // Group already gone; nothing to escalate against.
        return;
    }

    tokio::time::sleep(GRACE_PERIOD).await;

    debug!(pid, "escalating to SIGKILL");
    // SAFETY: same as above.
    unsafe {
        let _ = libc::killpg(pgid, libc::SIGKILL);
    }
}
