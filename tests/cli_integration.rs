//! CLI integration tests.
//!
//! These exercise the runcmd and genout binaries end to end.

use assert_cmd::Command;
use predicates::prelude::*;

// ============================================================================
// runcmd binary
// ============================================================================

#[test]
fn test_shell_echo_prints_output() {
    Command::cargo_bin("runcmd")
        .unwrap()
        .args(["-s", "echo Hello World"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hello World"));
}

#[test]
fn test_exit_code_mirrors_child() {
    Command::cargo_bin("runcmd")
        .unwrap()
        .args(["-s", "exit 7"])
        .assert()
        .code(7);
}

#[test]
#[cfg(unix)]
fn test_timeout_exits_with_distinguished_code() {
    Command::cargo_bin("runcmd")
        .unwrap()
        .args(["-s", "-t", "1", "sleep 10"])
        .timeout(std::time::Duration::from_secs(10))
        .assert()
        .code(124)
        .stderr(predicate::str::contains("timed out"));
}

#[test]
#[cfg(unix)]
fn test_timeout_still_prints_partial_output() {
    Command::cargo_bin("runcmd")
        .unwrap()
        .args(["-s", "-t", "1", "echo partial; sleep 10"])
        .timeout(std::time::Duration::from_secs(10))
        .assert()
        .code(124)
        .stdout(predicate::str::contains("partial"));
}

#[test]
fn test_spawn_failure_exit_code() {
    Command::cargo_bin("runcmd")
        .unwrap()
        .arg("nonexistent-binary-xyz")
        .assert()
        .code(127)
        .stderr(predicate::str::contains("failed to spawn"));
}

#[test]
fn test_no_command_is_usage_error() {
    Command::cargo_bin("runcmd")
        .unwrap()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no command supplied"));
}

#[test]
fn test_unknown_flag_is_usage_error() {
    Command::cargo_bin("runcmd")
        .unwrap()
        .arg("--definitely-not-a-flag")
        .assert()
        .code(2);
}

#[test]
fn test_version_flag() {
    Command::cargo_bin("runcmd")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_flag() {
    Command::cargo_bin("runcmd")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("USAGE"));
}

#[test]
#[cfg(unix)]
fn test_cwd_flag() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("cli-marker.txt"), b"x").unwrap();

    Command::cargo_bin("runcmd")
        .unwrap()
        .args(["-s", "-d", dir.path().to_str().unwrap(), "ls"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cli-marker.txt"));
}

#[test]
#[cfg(unix)]
fn test_env_flag() {
    Command::cargo_bin("runcmd")
        .unwrap()
        .args(["-s", "-e", "CLI_TEST_VAR=from-flag", "echo \"$CLI_TEST_VAR\""])
        .assert()
        .success()
        .stdout(predicate::str::contains("from-flag"));
}

#[test]
#[cfg(unix)]
fn test_ctrl_c_kills_child_and_exits_130() {
    use std::time::{Duration, Instant};

    let dir = tempfile::tempdir().unwrap();
    let pid_file = dir.path().join("child.pid");
    let script = format!("echo $$ > {}; exec sleep 30", pid_file.display());

    let mut wrapper = std::process::Command::new(assert_cmd::cargo::cargo_bin("runcmd"))
        .args(["-s", &script])
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .unwrap();

    // Wait for the child to report its pid.
    let deadline = Instant::now() + Duration::from_secs(10);
    let child_pid: i32 = loop {
        if let Ok(text) = std::fs::read_to_string(&pid_file) {
            if let Ok(pid) = text.trim().parse() {
                break pid;
            }
        }
        assert!(Instant::now() < deadline, "child never reported its pid");
        std::thread::sleep(Duration::from_millis(50));
    };

    // Give the wrapper a beat to install its signal handler.
    std::thread::sleep(Duration::from_millis(200));
    unsafe {
        libc::kill(wrapper.id() as i32, libc::SIGINT);
    }

    let status = wrapper.wait().unwrap();
    assert_eq!(status.code(), Some(130));

    // The child must not be left running as an orphan.
    let mut dead = false;
    for _ in 0..20 {
        if unsafe { libc::kill(child_pid, 0) } != 0 {
            dead = true;
            break;
        }
        std::thread::sleep(Duration::from_millis(100));
    }
    assert!(dead, "child {} kept running after Ctrl-C", child_pid);
}

// ============================================================================
// genout binary
// ============================================================================

#[test]
fn test_genout_produces_requested_volume() {
    let output = Command::cargo_bin("genout")
        .unwrap()
        .args(["2", "k"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    assert!(output.len() >= 2048, "got only {} bytes", output.len());
    let text = String::from_utf8_lossy(&output);
    assert!(text.trim_end().ends_with("bytes."));
}

#[test]
fn test_genout_rejects_bad_unit() {
    Command::cargo_bin("genout")
        .unwrap()
        .args(["2", "x"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown unit"));
}

#[test]
fn test_genout_rejects_overflowing_size() {
    // u64::MAX kilobytes does not fit in a byte count.
    Command::cargo_bin("genout")
        .unwrap()
        .args(["18446744073709551615", "k"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("overflows"));
}

#[test]
fn test_genout_usage_without_args() {
    Command::cargo_bin("genout")
        .unwrap()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}
