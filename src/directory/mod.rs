//! Directory domain layer: records, errors, and the operations facade

pub mod error;
pub mod facade;
pub mod records;

pub use error::{DirectoryError, DomainError, DomainErrorKind};
pub use facade::DirectoryFacade;
pub use records::{GroupListing, GroupRecord, GroupSpec, NewUser, UserEdit, UserListing, UserRecord};
