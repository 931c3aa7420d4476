//! Error handling utilities for the store

use atlas_core::error::DomainError;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Map a failed user insert/update, telling the two unique constraints apart
pub fn map_user_save_error(e: SqlxError, username: &str, email: &str) -> DomainError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return match db_err.constraint() {
                Some("users_email_key") => DomainError::EmailExists(email.to_string()),
                _ => DomainError::UsernameExists(username.to_string()),
            };
        }
    }
    DomainError::DatabaseError(e.to_string())
}
