//! Command dispatcher - the single funnel for every mutating operation
//!
//! Owns the audit invariant: one audit row per successful dispatch, written
//! in the same transaction as the business mutation, so either both commit
//! or neither does.

use std::sync::Arc;

use tracing::{info, instrument};

use atlas_core::command::{Command, ParsedCommand};
use atlas_core::entities::AuditRecord;
use atlas_core::error::DomainError;
use atlas_core::traits::Store;
use atlas_core::value_objects::{ChangeSet, EntityId};

use super::registry::HandlerRegistry;

/// Actor recorded when the identity source supplies none
pub const SYSTEM_ACTOR: &str = "system";

/// What the dispatcher returns to the transport layer
#[derive(Debug)]
pub struct DispatchOutcome {
    /// Id of the affected entity
    pub entity_id: EntityId,
    /// Field-level changes the handler applied
    pub changes: ChangeSet,
}

/// Routes commands to registered handlers and audits every success
pub struct CommandDispatcher {
    registry: Arc<HandlerRegistry>,
    store: Arc<dyn Store>,
}

impl CommandDispatcher {
    /// Create a dispatcher over a built registry and a store
    pub fn new(registry: Arc<HandlerRegistry>, store: Arc<dyn Store>) -> Self {
        Self { registry, store }
    }

    /// Execute one command end to end
    ///
    /// Steps: resolve the handler, parse the payload, run the handler and
    /// the audit write inside one transaction, commit. Any failure after
    /// `begin` drops the uncommitted session, rolling back both the
    /// mutation and the audit row. A missing or blank actor is recorded as
    /// `"system"` rather than failing the dispatch.
    #[instrument(
        skip(self, command, actor),
        fields(action = %command.action(), entity = %command.entity())
    )]
    pub async fn dispatch(
        &self,
        command: Command,
        actor: Option<&str>,
    ) -> Result<DispatchOutcome, DomainError> {
        let handler = self.registry.resolve(command.action(), command.entity())?;

        // Malformed payloads abort here, before any domain code runs
        let parsed = ParsedCommand::parse(command)?;

        let mut tx = self.store.begin().await?;
        let outcome = handler.process(&parsed, tx.as_mut()).await?;

        let actor = actor
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or(SYSTEM_ACTOR);
        let record = AuditRecord::new(
            outcome.entity_id,
            parsed.command().action(),
            parsed.command().entity(),
            parsed.command().path(),
            parsed.command().payload(),
            actor,
        );
        tx.insert_audit(&record).await?;
        tx.commit().await?;

        info!(
            entity_id = %outcome.entity_id,
            permission = %parsed.command().permission(),
            actor = %actor,
            changed = outcome.changes.len(),
            "Command dispatched"
        );

        Ok(DispatchOutcome {
            entity_id: outcome.entity_id,
            changes: outcome.changes,
        })
    }
}
