//! Shell command execution for the container helpers

use anyhow::{Context, Result};
use async_trait::async_trait;

/// Captured result of a finished shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal
    pub(crate) code: Option<i32>,
    pub(crate) stdout: String,
    pub(crate) stderr: String,
}

impl CommandOutput {
    pub(crate) fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs a command line through a shell
#[async_trait]
pub(crate) trait CommandRunner: Send + Sync {
    async fn run(&self, command: &str) -> Result<CommandOutput>;
}

/// Runs commands with `/bin/sh -c`
pub(crate) struct ShellRunner;

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, command: &str) -> Result<CommandOutput> {
        log::debug!("Running: {command}");
        let output = tokio::process::Command::new("/bin/sh")
            .arg("-c")
            .arg(command)
            .output()
            .await
            .with_context(|| format!("Failed to execute '{command}'"))?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shell_runner_captures_stdout() {
        let output = ShellRunner.run("echo hello").await.unwrap();
        assert!(output.success());
        assert_eq!(output.stdout, "hello\n");
    }

    #[tokio::test]
    async fn test_shell_runner_reports_exit_code() {
        let output = ShellRunner.run("echo oops >&2; exit 3").await.unwrap();
        assert!(!output.success());
        assert_eq!(output.code, Some(3));
        assert_eq!(output.stderr, "oops\n");
    }
}
