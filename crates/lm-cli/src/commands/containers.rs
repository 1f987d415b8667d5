//! Local development stack helpers
//!
//! Thin wrappers over docker / docker-compose. Captured stdout is printed; a
//! failing command ends the process with the command's own exit code.

use anyhow::Result;

use crate::commands::common::ExitCode;
use crate::commands::shell::CommandRunner;

/// Container used to run the server test suite
pub(crate) const SERVER_CONTAINER: &str = "logme_server";

/// A container lifecycle operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    Up,
    Down,
    List,
    Test,
}

impl Action {
    /// Shell command line for this action
    pub(crate) fn command(&self) -> String {
        match self {
            Action::Up => "docker-compose up -d".to_string(),
            Action::Down => "docker-compose down".to_string(),
            Action::List => {
                "docker ps --format \"table {{.ID}}\t{{.Names}}\t{{.State}}\t{{.Ports}}\""
                    .to_string()
            }
            Action::Test => {
                format!("docker exec -i {SERVER_CONTAINER} /usr/local/go/bin/go test")
            }
        }
    }
}

/// Execute a container action
pub(crate) async fn execute(action: Action, runner: &dyn CommandRunner) -> Result<()> {
    let command = action.command();
    let output = runner.run(&command).await?;

    println!("{}", output.stdout);

    if !output.success() {
        let stderr = output.stderr.trim();
        if !stderr.is_empty() {
            eprintln!("{stderr}");
        }
        match output.code {
            Some(code) => eprintln!("'{command}' exited with status {code}"),
            None => eprintln!("'{command}' was terminated by a signal"),
        }
        return Err(ExitCode(output.code.unwrap_or(1)).into());
    }

    Ok(())
}

#[cfg(test)]
#[path = "containers_test.rs"]
mod tests;
