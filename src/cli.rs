//! Command-line interface for runcmd.
//!
//! Uses lexopt for minimal binary size overhead.

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

/// Command-line arguments.
#[derive(Debug, Clone, Default)]
pub struct Args {
    /// Command to run.
    pub command: Option<String>,
    /// Delegate interpretation to the host shell.
    pub shell: bool,
    /// Wall-clock deadline. `None` waits indefinitely (a non-positive
    /// `--timeout` value also means unbounded).
    pub timeout: Option<Duration>,
    /// Working directory for the command.
    pub cwd: Option<PathBuf>,
    /// Environment variable overrides (KEY=VALUE pairs).
    pub env: Vec<(String, String)>,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: Option<String>,
    /// Show version and exit.
    pub version: bool,
    /// Show help and exit.
    pub help: bool,
}

/// Parse command-line arguments.
pub fn parse_args() -> Result<Args, ArgsError> {
    parse_args_from(std::env::args_os())
}

/// Parse arguments from an iterator (for testing).
pub fn parse_args_from<I>(args: I) -> Result<Args, ArgsError>
where
    I: IntoIterator<Item = OsString>,
{
    use lexopt::prelude::*;

    let mut result = Args::default();
    let mut parser = lexopt::Parser::from_iter(args);

    while let Some(arg) = parser.next()? {
        match arg {
            Short('h') | Long("help") => {
                result.help = true;
            }
            Short('V') | Long("version") => {
                result.version = true;
            }
            Short('s') | Long("shell") => {
                result.shell = true;
            }
            Short('t') | Long("timeout") => {
                let value: String = parser.value()?.parse()?;
                let secs: f64 = value
                    .parse()
                    .map_err(|_| ArgsError::InvalidValue("timeout", value))?;
                // A non-positive timeout waits indefinitely.
                result.timeout = (secs > 0.0).then(|| Duration::from_secs_f64(secs));
            }
            Short('d') | Long("cwd") => {
                result.cwd = Some(parser.value()?.parse()?);
            }
            Short('e') | Long("env") => {
                let value: String = parser.value()?.parse()?;
                let Some((key, val)) = value.split_once('=') else {
                    return Err(ArgsError::InvalidValue("env", value));
                };
                result.env.push((key.to_string(), val.to_string()));
            }
            Short('l') | Long("log-level") => {
                result.log_level = Some(parser.value()?.parse()?);
            }
            Value(val) => {
                if result.command.is_some() {
                    return Err(ArgsError::UnexpectedArgument(val.to_string_lossy().into()));
                }
                result.command = Some(val.to_string_lossy().into());
            }
            _ => return Err(arg.unexpected().into()),
        }
    }

    Ok(result)
}

/// Print help message.
pub fn print_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        r#"runcmd {version}
Run an external command with a hard wall-clock deadline

USAGE:
    runcmd [OPTIONS] <COMMAND>

ARGS:
    <COMMAND>               Command to run (quote it to pass arguments)

OPTIONS:
    -s, --shell             Run the command through the host shell
    -t, --timeout <SECS>    Kill the command after this many seconds
                            (fractional allowed; <= 0 waits indefinitely)
    -d, --cwd <DIR>         Working directory for the command
    -e, --env <KEY=VALUE>   Environment variable override (repeatable)
    -l, --log-level <LVL>   Log level (error, warn, info, debug, trace)
    -h, --help              Print help
    -V, --version           Print version

EXIT STATUS:
    Mirrors the child's exit code. Distinguished codes:
    124  command killed by the deadline
    127  command could not be spawned
    130  interrupted by Ctrl-C (the command is killed too)
    2    usage or configuration error

EXAMPLES:
    # Run with the shell, capture combined output
    runcmd -s "echo Hello World"

    # Kill a runaway build after five minutes
    runcmd -s -t 300 "make -j8"

    # Run in another directory with an extra variable
    runcmd -s -d /tmp -e GREETING=hello 'echo "$GREETING"'
"#
    );
}

/// Print version.
pub fn print_version() {
    println!("runcmd {}", env!("CARGO_PKG_VERSION"));
}

/// Argument parsing errors.
#[derive(Debug)]
pub enum ArgsError {
    /// Lexopt parsing error.
    Lexopt(lexopt::Error),
    /// Invalid argument value.
    InvalidValue(&'static str, String),
    /// Unexpected positional argument.
    UnexpectedArgument(String),
}

impl std::fmt::Display for ArgsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lexopt(e) => write!(f, "{}", e),
            Self::InvalidValue(name, value) => {
                write!(f, "invalid value for --{}: '{}'", name, value)
            }
            Self::UnexpectedArgument(arg) => {
                write!(f, "unexpected argument: '{}'", arg)
            }
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<lexopt::Error> for ArgsError {
    fn from(e: lexopt::Error) -> Self {
        Self::Lexopt(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(args: &[&str]) -> Vec<OsString> {
        std::iter::once("runcmd")
            .chain(args.iter().copied())
            .map(OsString::from)
            .collect()
    }

    #[test]
    fn test_default_args() {
        let result = parse_args_from(args(&[])).unwrap();
        assert!(result.command.is_none());
        assert!(!result.shell);
        assert!(result.timeout.is_none());
        assert!(result.cwd.is_none());
        assert!(result.env.is_empty());
    }

    #[test]
    fn test_positional_command() {
        let result = parse_args_from(args(&["echo hello"])).unwrap();
        assert_eq!(result.command, Some("echo hello".to_string()));
    }

    #[test]
    fn test_second_positional_rejected() {
        let result = parse_args_from(args(&["echo", "hello"]));
        assert!(result.is_err());
    }

    #[test]
    fn test_shell_flag() {
        let result = parse_args_from(args(&["-s", "ls"])).unwrap();
        assert!(result.shell);

        let result = parse_args_from(args(&["--shell", "ls"])).unwrap();
        assert!(result.shell);
    }

    #[test]
    fn test_timeout_seconds() {
        let result = parse_args_from(args(&["-t", "30", "sleep 60"])).unwrap();
        assert_eq!(result.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_timeout_fractional() {
        let result = parse_args_from(args(&["-t", "0.5", "sleep 60"])).unwrap();
        assert_eq!(result.timeout, Some(Duration::from_millis(500)));
    }

    #[test]
    fn test_timeout_zero_means_unbounded() {
        let result = parse_args_from(args(&["-t", "0", "sleep 60"])).unwrap();
        assert!(result.timeout.is_none());
    }

    #[test]
    fn test_timeout_negative_means_unbounded() {
        let result = parse_args_from(args(&["-t", "-1", "sleep 60"])).unwrap();
        assert!(result.timeout.is_none());
    }

    #[test]
    fn test_invalid_timeout() {
        let result = parse_args_from(args(&["-t", "soon", "ls"]));
        assert!(result.is_err());
    }

    #[test]
    fn test_cwd() {
        let result = parse_args_from(args(&["-d", "/tmp", "ls"])).unwrap();
        assert_eq!(result.cwd, Some(PathBuf::from("/tmp")));
    }

    #[test]
    fn test_env_pairs() {
        let result = parse_args_from(args(&["-e", "FOO=bar", "-e", "BAZ=qux", "env"])).unwrap();
        assert_eq!(
            result.env,
            vec![
                ("FOO".to_string(), "bar".to_string()),
                ("BAZ".to_string(), "qux".to_string())
            ]
        );
    }

    #[test]
    fn test_env_value_with_equals() {
        let result = parse_args_from(args(&["-e", "OPTS=a=b", "env"])).unwrap();
        assert_eq!(result.env, vec![("OPTS".to_string(), "a=b".to_string())]);
    }

    #[test]
    fn test_invalid_env_pair() {
        let result = parse_args_from(args(&["-e", "NOEQUALS", "env"]));
        assert!(result.is_err());
    }

    #[test]
    fn test_help_flag() {
        let result = parse_args_from(args(&["-h"])).unwrap();
        assert!(result.help);

        let result = parse_args_from(args(&["--help"])).unwrap();
        assert!(result.help);
    }

    #[test]
    fn test_version_flag() {
        let result = parse_args_from(args(&["-V"])).unwrap();
        assert!(result.version);

        let result = parse_args_from(args(&["--version"])).unwrap();
        assert!(result.version);
    }

    #[test]
    fn test_log_level() {
        let result = parse_args_from(args(&["-l", "debug", "ls"])).unwrap();
        assert_eq!(result.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_combined_options() {
        let result = parse_args_from(args(&[
            "-s",
            "-t",
            "10",
            "-d",
            "/tmp",
            "-e",
            "FOO=bar",
            "-l",
            "debug",
            "echo hi",
        ]))
        .unwrap();

        assert!(result.shell);
        assert_eq!(result.timeout, Some(Duration::from_secs(10)));
        assert_eq!(result.cwd, Some(PathBuf::from("/tmp")));
        assert_eq!(result.env.len(), 1);
        assert_eq!(result.log_level, Some("debug".to_string()));
        assert_eq!(result.command, Some("echo hi".to_string()));
    }
}
