//! Directory error types
//!
//! Business-rule violations carry a fixed numeric identifier per failure
//! site plus a field-keyed map of human-readable messages; transport and
//! parse failures stay in their own variants so callers can tell the two
//! apart by shape.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::external::command::CommandError;
use crate::external::signal::SignalError;
use crate::external::validate::ValidateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainErrorKind {
    /// A business rule rejected the request (duplicate key, failed validation)
    NotValid,
    /// The record the request targets does not exist
    NotFound,
}

impl fmt::Display for DomainErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainErrorKind::NotValid => write!(f, "not-valid"),
            DomainErrorKind::NotFound => write!(f, "not-found"),
        }
    }
}

/// Structured business-rule failure
///
/// The `id` is a literal constant distinct per call site, used to correlate
/// a rejected operation with the service logs; it is never computed.
#[derive(Debug, Clone, Error)]
#[error("{kind} [{id}]: {}", format_attributes(.attributes))]
pub struct DomainError {
    pub id: u64,
    pub kind: DomainErrorKind,
    pub attributes: BTreeMap<String, String>,
}

impl DomainError {
    pub fn not_valid(id: u64) -> Self {
        Self {
            id,
            kind: DomainErrorKind::NotValid,
            attributes: BTreeMap::new(),
        }
    }

    pub fn not_found(id: u64) -> Self {
        Self {
            id,
            kind: DomainErrorKind::NotFound,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, field: &str, message: impl Into<String>) -> Self {
        self.attributes.insert(field.to_string(), message.into());
        self
    }
}

fn format_attributes(attributes: &BTreeMap<String, String>) -> String {
    attributes
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Facade-level error
///
/// `Domain` is the only variant produced by this crate's own rules; the
/// rest pass boundary failures through unchanged.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("Command execution error: {source}")]
    Command {
        #[from]
        source: CommandError,
    },
    #[error("Signal delivery error: {source}")]
    Signal {
        #[from]
        source: SignalError,
    },
    #[error("Unparseable listing output: {source}")]
    Parse {
        #[from]
        source: serde_json::Error,
    },
}

// A failed rule surfaces as the domain error it was populated with; a
// validator that could not run at all stays a transport failure.
impl From<ValidateError> for DirectoryError {
    fn from(err: ValidateError) -> Self {
        match err {
            ValidateError::RuleFailed(domain) => DirectoryError::Domain(domain),
            ValidateError::CommandError { source } => DirectoryError::Command { source },
        }
    }
}

impl DirectoryError {
    /// The domain error inside this failure, if it is one
    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            DirectoryError::Domain(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_display_includes_id_and_fields() {
        let err = DomainError::not_valid(1150823484726)
            .with_attribute("name", "group sales already exists");

        let rendered = err.to_string();
        assert!(rendered.contains("not-valid"));
        assert!(rendered.contains("1150823484726"));
        assert!(rendered.contains("group sales already exists"));
    }

    #[test]
    fn test_transport_errors_are_distinguishable_from_domain_errors() {
        let transport: DirectoryError = CommandError::ExecutionFailed {
            message: "exit 1".to_string(),
        }
        .into();
        let domain: DirectoryError = DomainError::not_found(1508246496389).into();

        assert!(transport.domain().is_none());
        assert_eq!(domain.domain().unwrap().id, 1508246496389);
    }
}
