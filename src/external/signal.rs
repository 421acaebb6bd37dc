//! Named-event signal emission
//!
//! Mutations in the directory are not performed by this crate; they are
//! requested by emitting a named event that the account service subscribes
//! to. Emission is fire-and-forget: a successful return only means the
//! notifier accepted the event for delivery.

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use super::command::{CommandError, CommandExecutor};
use std::sync::Arc;

#[derive(Debug, Error)]
pub enum SignalError {
    #[error("Notifier rejected event '{event}': {message}")]
    Rejected { event: String, message: String },
    #[error("Command execution error: {source}")]
    CommandError {
        #[from]
        source: CommandError,
    },
}

/// Trait for emitting named events toward the account service
#[async_trait]
pub trait SignalEmitter: Send + Sync {
    async fn signal(&self, event: &str, params: &[String]) -> Result<(), SignalError>;
}

/// Real implementation invoking the configured notifier utility
///
/// Argv shape: `<notifier> <event> <param>...`
pub struct NotifierSignalEmitter {
    executor: Arc<dyn CommandExecutor>,
    notifier: String,
}

impl NotifierSignalEmitter {
    pub fn new(executor: Arc<dyn CommandExecutor>, notifier: String) -> Self {
        Self { executor, notifier }
    }
}

#[async_trait]
impl SignalEmitter for NotifierSignalEmitter {
    async fn signal(&self, event: &str, params: &[String]) -> Result<(), SignalError> {
        let mut args = Vec::with_capacity(params.len() + 1);
        args.push(event.to_string());
        args.extend_from_slice(params);

        let output = self.executor.run(&self.notifier, &args).await?;

        if !output.success() {
            return Err(SignalError::Rejected {
                event: event.to_string(),
                message: output.stderr.trim().to_string(),
            });
        }

        info!(event = event, params = ?params, "Signal accepted for delivery");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::command::CommandOutput;

    struct ScriptedExecutor {
        status_code: i32,
        stderr: String,
    }

    #[async_trait]
    impl CommandExecutor for ScriptedExecutor {
        async fn run(
            &self,
            _program: &str,
            _args: &[String],
        ) -> Result<CommandOutput, CommandError> {
            Ok(CommandOutput {
                status_code: self.status_code,
                stdout: String::new(),
                stderr: self.stderr.clone(),
            })
        }
    }

    #[tokio::test]
    async fn test_signal_resolves_on_accepted_event() {
        let emitter = NotifierSignalEmitter::new(
            Arc::new(ScriptedExecutor {
                status_code: 0,
                stderr: String::new(),
            }),
            "notify".to_string(),
        );

        let result = emitter
            .signal("group-create", &["ops".to_string(), "bob".to_string()])
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_signal_rejects_on_notifier_failure() {
        let emitter = NotifierSignalEmitter::new(
            Arc::new(ScriptedExecutor {
                status_code: 1,
                stderr: "no such event channel\n".to_string(),
            }),
            "notify".to_string(),
        );

        let result = emitter.signal("group-create", &["ops".to_string()]).await;
        match result {
            Err(SignalError::Rejected { event, message }) => {
                assert_eq!(event, "group-create");
                assert_eq!(message, "no such event channel");
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }
}
