//! Runcmd binary entry point.
//!
//! Thin wrapper over the buffering API: runs the command, prints its
//! combined output, and mirrors the child's exit code (124 on timeout,
//! 127 on spawn failure, 130 on Ctrl-C, 2 on usage errors).

use std::io::Write;

use runcmd::{cli, logging, CommandSpec, Executor, RunCmdError};
use tracing::debug;

/// Wrapper exit code when the command was killed by the deadline.
const EXIT_TIMED_OUT: i32 = 124;
/// Wrapper exit code when the command could not be spawned.
const EXIT_SPAWN_FAILED: i32 = 127;
/// Wrapper exit code when Ctrl-C cut the run short (128 + SIGINT).
const EXIT_INTERRUPTED: i32 = 130;
/// Wrapper exit code for usage and configuration errors.
const EXIT_USAGE: i32 = 2;

#[tokio::main]
async fn main() {
    let args = match cli::parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("runcmd: {}", e);
            eprintln!("Try 'runcmd --help' for more information.");
            std::process::exit(EXIT_USAGE);
        }
    };

    if args.help {
        cli::print_help();
        return;
    }
    if args.version {
        cli::print_version();
        return;
    }

    logging::init_with(args.log_level.as_deref());

    let Some(command) = args.command else {
        eprintln!("runcmd: no command supplied");
        eprintln!("Try 'runcmd --help' for more information.");
        std::process::exit(EXIT_USAGE);
    };

    let mut spec = CommandSpec::new(command).shell(args.shell).envs(args.env);
    if let Some(timeout) = args.timeout {
        spec = spec.timeout(timeout);
    }
    if let Some(cwd) = args.cwd {
        spec = spec.working_dir(cwd);
    }

    // The child lives in its own process group, out of reach of the
    // terminal's SIGINT; kill_on_interrupt makes Ctrl-C on the wrapper
    // take the child (and its descendants) down with it.
    let executor = Executor::new().kill_on_interrupt(true);
    let result = match executor.execute(&spec).await {
        Ok(result) => result,
        Err(RunCmdError::InvalidCommand(msg)) => {
            eprintln!("runcmd: invalid command: {}", msg);
            std::process::exit(EXIT_USAGE);
        }
        Err(e @ RunCmdError::Spawn { .. }) => {
            eprintln!("runcmd: {}", e);
            std::process::exit(EXIT_SPAWN_FAILED);
        }
        Err(e @ RunCmdError::Interrupted(_)) => {
            eprintln!("runcmd: {}", e);
            std::process::exit(EXIT_INTERRUPTED);
        }
        Err(e) => {
            eprintln!("runcmd: {}", e);
            std::process::exit(1);
        }
    };

    debug!(
        code = ?result.exit_code,
        timed_out = result.timed_out,
        duration = ?result.duration,
        "command finished"
    );

    // Raw bytes, exactly as the child produced them.
    let mut stdout = std::io::stdout();
    let _ = stdout.write_all(&result.output);
    let _ = stdout.flush();

    if result.timed_out {
        eprintln!("runcmd: command timed out after {:?}", result.duration);
        std::process::exit(EXIT_TIMED_OUT);
    }
    std::process::exit(result.exit_code());
}
