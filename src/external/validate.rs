//! Field validation rule invocation
//!
//! Validation rules (password strength, at present) live in an external
//! script, not in this crate. The caller supplies the domain error to
//! reject with so the failure carries the call site's correlation id.

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use super::command::{CommandError, CommandExecutor};
use crate::directory::error::DomainError;
use std::sync::Arc;

#[derive(Debug, Error)]
pub enum ValidateError {
    #[error(transparent)]
    RuleFailed(#[from] DomainError),
    #[error("Command execution error: {source}")]
    CommandError {
        #[from]
        source: CommandError,
    },
}

/// Trait for invoking named validation rules
#[async_trait]
pub trait FieldValidator: Send + Sync {
    /// Run `rule` against `args`; reject with the populated `error`
    /// template when the rule fails.
    async fn validate(
        &self,
        rule: &str,
        args: &[String],
        error: DomainError,
    ) -> Result<(), ValidateError>;
}

/// Real implementation invoking the configured validation script
///
/// Argv shape: `<validator> <rule> <arg>...`; a non-zero exit means the
/// rule rejected its input.
pub struct ScriptFieldValidator {
    executor: Arc<dyn CommandExecutor>,
    validator: String,
}

impl ScriptFieldValidator {
    pub fn new(executor: Arc<dyn CommandExecutor>, validator: String) -> Self {
        Self { executor, validator }
    }
}

#[async_trait]
impl FieldValidator for ScriptFieldValidator {
    async fn validate(
        &self,
        rule: &str,
        args: &[String],
        error: DomainError,
    ) -> Result<(), ValidateError> {
        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push(rule.to_string());
        argv.extend_from_slice(args);

        let output = self.executor.run(&self.validator, &argv).await?;

        if !output.success() {
            warn!(rule = rule, id = error.id, "Validation rule rejected input");
            return Err(ValidateError::RuleFailed(error));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::command::CommandOutput;

    struct ScriptedExecutor {
        status_code: i32,
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
                stderr: String::new(),
            })
        }
    }

    #[tokio::test]
    async fn test_validate_passes_on_zero_exit() {
        let validator = ScriptFieldValidator::new(
            Arc::new(ScriptedExecutor { status_code: 0 }),
            "validate".to_string(),
        );

        let result = validator
            .validate(
                "password-strength",
                &["hunter2".to_string()],
                DomainError::not_valid(42),
            )
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_validate_rejects_with_populated_template() {
        let validator = ScriptFieldValidator::new(
            Arc::new(ScriptedExecutor { status_code: 1 }),
            "validate".to_string(),
        );

        let template =
            DomainError::not_valid(1340134737252).with_attribute("password", "password too weak");
        let result = validator
            .validate("password-strength", &["abc".to_string()], template)
            .await;

        match result {
            Err(ValidateError::RuleFailed(err)) => {
                assert_eq!(err.id, 1340134737252);
                assert_eq!(
                    err.attributes.get("password").map(String::as_str),
                    Some("password too weak")
                );
            }
            other => panic!("expected RuleFailed, got {other:?}"),
        }
    }
}
