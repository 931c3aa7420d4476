//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::command::{Action, EntityKind};
use crate::value_objects::EntityId;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Payload Errors
    // =========================================================================
    #[error("Unsupported parameters: {}", fields.join(", "))]
    UnsupportedParameter { fields: Vec<String> },

    #[error("Malformed payload: {detail}")]
    MalformedPayload { detail: String },

    #[error("Type mismatch for field '{field}': expected {expected}")]
    TypeMismatch { field: String, expected: &'static str },

    #[error("Validation failed for field '{field}': {rule}")]
    ValidationFailed { field: String, rule: String },

    // =========================================================================
    // Dispatch Errors
    // =========================================================================
    #[error("No handler registered for command {action}_{entity}")]
    UnknownCommand { action: Action, entity: EntityKind },

    #[error("Duplicate handler registration for command {action}_{entity}")]
    DuplicateRegistration { action: Action, entity: EntityKind },

    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Office not found: {0}")]
    OfficeNotFound(EntityId),

    #[error("User not found: {0}")]
    UserNotFound(EntityId),

    #[error("Role not found: {0}")]
    RoleNotFound(EntityId),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Office code already in use: {0}")]
    OfficeCodeExists(String),

    #[error("Username already in use: {0}")]
    UsernameExists(String),

    #[error("Email already in use: {0}")]
    EmailExists(String),

    #[error("Role name already in use: {0}")]
    RoleNameExists(String),

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("Office {0} still has child offices")]
    OfficeHasChildren(EntityId),

    #[error("Office {0} still has assigned users")]
    OfficeHasUsers(EntityId),

    #[error("Role {0} is still assigned to users")]
    RoleInUse(EntityId),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Shorthand for a single-field validation failure
    pub fn validation(field: impl Into<String>, rule: impl Into<String>) -> Self {
        Self::ValidationFailed {
            field: field.into(),
            rule: rule.into(),
        }
    }

    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Payload
            Self::UnsupportedParameter { .. } => "UNSUPPORTED_PARAMETER",
            Self::MalformedPayload { .. } => "MALFORMED_PAYLOAD",
            Self::TypeMismatch { .. } => "TYPE_MISMATCH",
            Self::ValidationFailed { .. } => "VALIDATION_FAILED",

            // Dispatch
            Self::UnknownCommand { .. } => "UNKNOWN_COMMAND",
            Self::DuplicateRegistration { .. } => "DUPLICATE_REGISTRATION",

            // Not Found
            Self::OfficeNotFound(_) => "UNKNOWN_OFFICE",
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::RoleNotFound(_) => "UNKNOWN_ROLE",

            // Conflict
            Self::OfficeCodeExists(_) => "OFFICE_CODE_EXISTS",
            Self::UsernameExists(_) => "USERNAME_EXISTS",
            Self::EmailExists(_) => "EMAIL_EXISTS",
            Self::RoleNameExists(_) => "ROLE_NAME_EXISTS",

            // Business Rules
            Self::OfficeHasChildren(_) => "OFFICE_HAS_CHILDREN",
            Self::OfficeHasUsers(_) => "OFFICE_HAS_USERS",
            Self::RoleInUse(_) => "ROLE_IN_USE",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::OfficeNotFound(_) | Self::UserNotFound(_) | Self::RoleNotFound(_)
        )
    }

    /// Check if this is a payload or validation error (client fault)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedParameter { .. }
                | Self::MalformedPayload { .. }
                | Self::TypeMismatch { .. }
                | Self::ValidationFailed { .. }
        )
    }

    /// Check if this is a conflict error (uniqueness or in-use guard)
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::OfficeCodeExists(_)
                | Self::UsernameExists(_)
                | Self::EmailExists(_)
                | Self::RoleNameExists(_)
                | Self::OfficeHasChildren(_)
                | Self::OfficeHasUsers(_)
                | Self::RoleInUse(_)
        )
    }

    /// Check if this is a dispatch wiring error (server configuration fault)
    pub fn is_wiring(&self) -> bool {
        matches!(
            self,
            Self::UnknownCommand { .. } | Self::DuplicateRegistration { .. }
        )
    }
}
