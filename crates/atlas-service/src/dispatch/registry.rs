//! Handler registry - resolves `(action, entity)` to exactly one handler
//!
//! Populated once during startup, before the server accepts connections,
//! and read-only afterwards; shared across request tasks behind an `Arc`
//! with no locking.

use std::collections::HashMap;
use std::sync::Arc;

use atlas_core::command::{Action, EntityKind};
use atlas_core::error::DomainError;

use super::handler::CommandHandler;

/// Process-wide table mapping `(action, entity)` to a handler
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<(Action, EntityKind), Arc<dyn CommandHandler>>,
}

impl HandlerRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under its declared `(action, entity)` key
    ///
    /// Fails with [`DomainError::DuplicateRegistration`] when a second
    /// handler claims the same key. This error is startup-fatal: the process
    /// must not serve traffic with an ambiguous registration.
    pub fn register(&mut self, handler: Arc<dyn CommandHandler>) -> Result<(), DomainError> {
        let key = (handler.action(), handler.entity());
        if self.handlers.contains_key(&key) {
            return Err(DomainError::DuplicateRegistration {
                action: key.0,
                entity: key.1,
            });
        }
        self.handlers.insert(key, handler);
        Ok(())
    }

    /// Resolve the handler for a command key
    ///
    /// A miss is a server configuration error, not a client error: in a
    /// correctly wired deployment every routable command has a handler.
    pub fn resolve(
        &self,
        action: Action,
        entity: EntityKind,
    ) -> Result<Arc<dyn CommandHandler>, DomainError> {
        self.handlers
            .get(&(action, entity))
            .cloned()
            .ok_or(DomainError::UnknownCommand { action, entity })
    }

    /// Number of registered handlers
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// True when nothing has been registered yet
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
