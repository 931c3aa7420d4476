//! # atlas-core
//!
//! Domain layer containing entities, value objects, the payload accessor,
//! the command vocabulary, the change-tracking protocol, and store traits.
//! This crate has zero dependencies on infrastructure (database, web
//! framework, etc.).

pub mod command;
pub mod entities;
pub mod error;
pub mod payload;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use command::{Action, Command, EntityKind, ParsedCommand};
pub use entities::{AuditRecord, Office, Role, User};
pub use error::DomainError;
pub use payload::{FieldState, Payload};
pub use traits::{
    ApplyChanges, AuditFilter, OfficeFilter, RepoResult, Store, StoreTx, UserFilter,
};
pub use value_objects::{ChangeSet, EntityId, EntityIdGenerator, EntityIdParseError};
