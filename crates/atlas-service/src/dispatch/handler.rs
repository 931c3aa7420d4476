//! Command handler contract
//!
//! One handler per `(action, entity)` pair, registered at startup and
//! resolved by the dispatcher at request time.

use async_trait::async_trait;

use atlas_core::command::{Action, EntityKind, ParsedCommand};
use atlas_core::error::DomainError;
use atlas_core::traits::StoreTx;
use atlas_core::value_objects::{ChangeSet, EntityId};

/// What a handler reports back after a successful mutation
#[derive(Debug)]
pub struct HandlerOutcome {
    /// Id of the entity the command affected
    pub entity_id: EntityId,
    /// Field-level changes applied; empty for creates, deletes, and no-op
    /// updates
    pub changes: ChangeSet,
}

impl HandlerOutcome {
    /// Outcome with no field changes to report
    pub fn unchanged(entity_id: EntityId) -> Self {
        Self {
            entity_id,
            changes: ChangeSet::new(),
        }
    }
}

/// A registered handler for one `(action, entity)` key
///
/// `process` runs inside the dispatcher's transaction; every read and write
/// must go through the supplied session so a failure rolls the whole
/// dispatch back, audit included.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Action verb this handler claims
    fn action(&self) -> Action;

    /// Entity kind this handler claims
    fn entity(&self) -> EntityKind;

    /// Execute the command
    async fn process(
        &self,
        command: &ParsedCommand,
        tx: &mut dyn StoreTx,
    ) -> Result<HandlerOutcome, DomainError>;
}

impl std::fmt::Debug for dyn CommandHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandHandler")
            .field("action", &self.action())
            .field("entity", &self.entity())
            .finish()
    }
}
