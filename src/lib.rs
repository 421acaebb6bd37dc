// userdir Library - User and Group Directory Operations
// This exposes the core components for testing and integration

pub mod config;
pub mod directory;
pub mod external;
pub mod telemetry;

// Re-export key types for easy access
pub use config::{ObservabilityConfig, ScriptsConfig, SignalsConfig, UserdirConfig};
pub use directory::{
    DirectoryError, DirectoryFacade, DomainError, DomainErrorKind, GroupListing, GroupRecord,
    GroupSpec, NewUser, UserEdit, UserListing, UserRecord,
};
pub use external::{
    CommandError, CommandExecutor, CommandOutput, FieldValidator, NotifierSignalEmitter,
    ScriptFieldValidator, SignalEmitter, SignalError, TokioCommandExecutor, ValidateError,
};
pub use telemetry::init_telemetry;
