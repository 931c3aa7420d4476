//! Registered command handlers
//!
//! One handler per `(action, entity)` pair: create/update/delete for each
//! of office, user, and role. [`build_registry`] wires all nine during
//! startup; a duplicate key aborts before the process serves traffic.

mod office;
mod role;
mod user;
mod validation;

pub use office::{CreateOfficeHandler, DeleteOfficeHandler, UpdateOfficeHandler};
pub use role::{CreateRoleHandler, DeleteRoleHandler, UpdateRoleHandler};
pub use user::{CreateUserHandler, DeleteUserHandler, UpdateUserHandler};

use std::sync::Arc;

use atlas_core::error::DomainError;
use atlas_core::value_objects::EntityIdGenerator;

use crate::dispatch::HandlerRegistry;

/// Build the registry with every handler this deployment serves
pub fn build_registry(ids: Arc<EntityIdGenerator>) -> Result<HandlerRegistry, DomainError> {
    let mut registry = HandlerRegistry::new();

    registry.register(Arc::new(CreateOfficeHandler::new(Arc::clone(&ids))))?;
    registry.register(Arc::new(UpdateOfficeHandler))?;
    registry.register(Arc::new(DeleteOfficeHandler))?;

    registry.register(Arc::new(CreateUserHandler::new(Arc::clone(&ids))))?;
    registry.register(Arc::new(UpdateUserHandler))?;
    registry.register(Arc::new(DeleteUserHandler))?;

    registry.register(Arc::new(CreateRoleHandler::new(ids)))?;
    registry.register(Arc::new(UpdateRoleHandler))?;
    registry.register(Arc::new(DeleteRoleHandler))?;

    Ok(registry)
}
