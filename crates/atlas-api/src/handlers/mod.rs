//! API request handlers
//!
//! Mutating handlers build a [`atlas_core::Command`] from the request and
//! hand it to the dispatcher; read handlers go through the query service.

pub mod audits;
pub mod health;
pub mod offices;
pub mod roles;
pub mod users;

use atlas_core::EntityId;

use crate::response::ApiError;

/// Parse a path segment as an entity id
pub(crate) fn parse_id(raw: &str, name: &str) -> Result<EntityId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::invalid_path(format!("Invalid {name} format")))
}
