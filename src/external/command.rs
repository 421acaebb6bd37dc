//! Base command execution abstraction
//!
//! Provides the foundational trait for spawning the external directory
//! utilities, enabling dependency injection for testing.

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub status_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status_code == 0
    }
}

#[derive(Debug, Error, Clone)]
pub enum CommandError {
    #[error("Command not found: {command}")]
    CommandNotFound { command: String },
    #[error("Command failed: {message}")]
    ExecutionFailed { message: String },
    #[error("IO error: {message}")]
    Io { message: String },
}

/// Trait for executing external commands
///
/// The facade never touches `tokio::process` directly; everything goes
/// through this seam so tests can substitute scripted implementations.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, CommandError>;
}

/// Real implementation using tokio::process::Command
pub struct TokioCommandExecutor;

#[async_trait]
impl CommandExecutor for TokioCommandExecutor {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, CommandError> {
        debug!(program = program, args = ?args, "Spawning external command");

        let output = tokio::process::Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    CommandError::CommandNotFound {
                        command: program.to_string(),
                    }
                } else {
                    CommandError::Io {
                        message: e.to_string(),
                    }
                }
            })?;

        Ok(CommandOutput {
            status_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_tokio_executor_captures_stdout() {
        let executor = TokioCommandExecutor;
        let result = executor.run("echo", &["hello".to_string()]).await;

        assert!(result.is_ok());
        let output = result.unwrap();
        assert!(output.success());
        assert!(output.stdout.contains("hello"));
    }

    #[tokio::test]
    async fn test_tokio_executor_command_not_found() {
        let executor = TokioCommandExecutor;
        let result = executor.run("nonexistent_command_xyz", &[]).await;

        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err(),
            CommandError::CommandNotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_tokio_executor_nonzero_exit_is_not_transport_error() {
        let executor = TokioCommandExecutor;
        let result = executor.run("false", &[]).await;

        // A failing utility still produces output; only spawn failures reject.
        assert!(result.is_ok());
        assert!(!result.unwrap().success());
    }
}
