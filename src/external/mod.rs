//! External capability abstractions
//!
//! This module provides trait-based abstractions for the three boundaries
//! the facade consumes: spawning the directory utilities, emitting named
//! events toward the account service, and invoking validation rules.
//! Each trait has one production implementation and is injected, enabling
//! scripted implementations in tests.

pub mod command;
pub mod signal;
pub mod validate;

pub use command::{CommandError, CommandExecutor, CommandOutput, TokioCommandExecutor};
pub use signal::{NotifierSignalEmitter, SignalEmitter, SignalError};
pub use validate::{FieldValidator, ScriptFieldValidator, ValidateError};
