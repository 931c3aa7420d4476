//! Shared payload validation primitives
//!
//! Validation runs strictly before `apply_changes`: handlers check
//! required-ness, lengths, formats, and ranges on the raw payload so the
//! change-tracking protocol can assume a well-formed request.

use validator::{ValidateEmail, ValidateLength};

use atlas_core::error::DomainError;
use atlas_core::payload::{FieldState, Payload};

/// The field must be present with a non-null value
pub(crate) fn require_field(payload: &Payload, field: &str) -> Result<(), DomainError> {
    if payload.field_exists(field) {
        Ok(())
    } else {
        Err(DomainError::validation(field, "is required"))
    }
}

/// The field must not be an explicit null
///
/// Used on update paths for fields that are required on the entity: a null
/// there is a request to clear something that must stay set.
pub(crate) fn reject_null(payload: &Payload, field: &str) -> Result<(), DomainError> {
    if matches!(payload.state(field), FieldState::Null) {
        Err(DomainError::validation(field, "must not be null"))
    } else {
        Ok(())
    }
}

/// When present, the string field must fall inside the length bounds
pub(crate) fn check_length(
    payload: &Payload,
    field: &str,
    min: u64,
    max: u64,
) -> Result<(), DomainError> {
    if let Some(value) = payload.get_str(field)? {
        if !value.validate_length(Some(min), Some(max), None) {
            return Err(DomainError::validation(
                field,
                format!("length must be between {min} and {max}"),
            ));
        }
    }
    Ok(())
}

/// When present, the field must be a syntactically valid email address
pub(crate) fn check_email(payload: &Payload, field: &str) -> Result<(), DomainError> {
    if let Some(value) = payload.get_str(field)? {
        if !value.validate_email() {
            return Err(DomainError::validation(field, "is not a valid email address"));
        }
    }
    Ok(())
}

/// When present, the numeric field must fall inside the closed range
pub(crate) fn check_range(
    payload: &Payload,
    field: &str,
    min: f64,
    max: f64,
) -> Result<(), DomainError> {
    if let Some(value) = payload.get_f64(field)? {
        if !(min..=max).contains(&value) {
            return Err(DomainError::validation(
                field,
                format!("must be between {min} and {max}"),
            ));
        }
    }
    Ok(())
}
