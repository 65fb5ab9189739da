//! Command specification and validation.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::RunCmdError;
use crate::Result;

/// Everything needed to run one command: the command line, shell mode,
/// an optional wall-clock deadline, and working directory / environment
/// overrides. Immutable once execution begins.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// The command line to execute.
    pub command_line: String,
    /// Delegate interpretation to the host shell (`/bin/sh -c` on Unix,
    /// `cmd.exe /C` on Windows).
    ///
    /// # Security
    ///
    /// In shell mode the raw string reaches the shell verbatim, so
    /// argument injection is inherent to the feature. No sanitizing is
    /// attempted; that responsibility stays with the caller.
    pub shell: bool,
    /// Wall-clock deadline; `None` (or zero) waits indefinitely.
    pub timeout: Option<Duration>,
    /// Working directory override (if any).
    pub working_dir: Option<PathBuf>,
    /// Environment variables set on top of the inherited environment.
    pub env: HashMap<String, String>,
}

impl CommandSpec {
    /// Create a spec for the given command line. Shell mode is off and no
    /// deadline is set.
    pub fn new(command_line: impl Into<String>) -> Self {
        Self {
            command_line: command_line.into(),
            shell: false,
            timeout: None,
            working_dir: None,
            env: HashMap::new(),
        }
    }

    /// Enable or disable shell interpretation.
    pub fn shell(mut self, shell: bool) -> Self {
        self.shell = shell;
        self
    }

    /// Set the wall-clock deadline.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Set the working directory.
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Add an environment variable override.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Add multiple environment variable overrides.
    pub fn envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in vars {
            self.env.insert(k.into(), v.into());
        }
        self
    }

    /// Reject specs that cannot possibly spawn, before any process or
    /// timer is created.
    pub fn validate(&self) -> Result<()> {
        if self.command_line.trim().is_empty() {
            return Err(RunCmdError::InvalidCommand("command is empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_defaults() {
        let spec = CommandSpec::new("ls -la");
        assert_eq!(spec.command_line, "ls -la");
        assert!(!spec.shell);
        assert!(spec.timeout.is_none());
        assert!(spec.working_dir.is_none());
        assert!(spec.env.is_empty());
    }

    #[test]
    fn test_spec_builder_chain() {
        let spec = CommandSpec::new("make test")
            .shell(true)
            .timeout(Duration::from_secs(60))
            .working_dir("/project")
            .env("RUST_LOG", "debug");

        assert!(spec.shell);
        assert_eq!(spec.timeout, Some(Duration::from_secs(60)));
        assert_eq!(spec.working_dir, Some(PathBuf::from("/project")));
        assert_eq!(spec.env.get("RUST_LOG"), Some(&"debug".to_string()));
    }

    #[test]
    fn test_spec_envs() {
        let vars = [("KEY1", "val1"), ("KEY2", "val2")];
        let spec = CommandSpec::new("echo").envs(vars);

        assert_eq!(spec.env.len(), 2);
        assert_eq!(spec.env.get("KEY1"), Some(&"val1".to_string()));
        assert_eq!(spec.env.get("KEY2"), Some(&"val2".to_string()));
    }

    #[test]
    fn test_validate_accepts_command() {
        assert!(CommandSpec::new("echo hello").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty() {
        let err = CommandSpec::new("").validate().unwrap_err();
        assert!(matches!(err, RunCmdError::InvalidCommand(_)));
    }

    #[test]
    fn test_validate_rejects_whitespace_only() {
        let err = CommandSpec::new("   \t ").validate().unwrap_err();
        assert!(matches!(err, RunCmdError::InvalidCommand(_)));
    }
}
