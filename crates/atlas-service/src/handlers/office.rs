//! Office command handlers
//!
//! Create, update, and delete for the administrative office hierarchy.
//! `parentId` is a relationship field: the entity reports the change and
//! the handler resolves and links the new parent.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use atlas_core::command::{Action, EntityKind, ParsedCommand};
use atlas_core::entities::Office;
use atlas_core::error::DomainError;
use atlas_core::payload::Payload;
use atlas_core::traits::{ApplyChanges, StoreTx};
use atlas_core::value_objects::{EntityId, EntityIdGenerator};

use crate::dispatch::{CommandHandler, HandlerOutcome};

use super::validation::{check_length, check_range, reject_null, require_field};

fn validate_office(payload: &Payload, creating: bool) -> Result<(), DomainError> {
    if creating {
        require_field(payload, "code")?;
        require_field(payload, "nameEn")?;
    } else {
        reject_null(payload, "code")?;
        reject_null(payload, "nameEn")?;
    }
    check_length(payload, "code", 2, 32)?;
    check_length(payload, "nameEn", 1, 128)?;
    check_length(payload, "nameKh", 1, 128)?;
    check_length(payload, "phone", 3, 32)?;
    check_range(payload, "latitude", -90.0, 90.0)?;
    check_range(payload, "longitude", -180.0, 180.0)?;
    Ok(())
}

/// Handles `CREATE_OFFICE`
pub struct CreateOfficeHandler {
    ids: Arc<EntityIdGenerator>,
}

impl CreateOfficeHandler {
    pub fn new(ids: Arc<EntityIdGenerator>) -> Self {
        Self { ids }
    }
}

#[async_trait]
impl CommandHandler for CreateOfficeHandler {
    fn action(&self) -> Action {
        Action::Create
    }

    fn entity(&self) -> EntityKind {
        EntityKind::Office
    }

    async fn process(
        &self,
        command: &ParsedCommand,
        tx: &mut dyn StoreTx,
    ) -> Result<HandlerOutcome, DomainError> {
        let payload = command.payload();
        payload.reject_unknown(Office::PAYLOAD_FIELDS)?;
        validate_office(payload, true)?;

        let id = self.ids.generate();
        let mut office = Office::new(id, String::new(), String::new());
        office.apply_changes(payload)?;

        if let Some(parent_id) = payload.get_id("parentId")? {
            tx.find_office(parent_id)
                .await?
                .ok_or(DomainError::OfficeNotFound(parent_id))?;
            office.parent_id = Some(parent_id);
        }

        if tx.find_office_by_code(&office.code).await?.is_some() {
            return Err(DomainError::OfficeCodeExists(office.code.clone()));
        }

        tx.insert_office(&office).await?;
        info!(office_id = %id, code = %office.code, "Office created");
        Ok(HandlerOutcome::unchanged(id))
    }
}

/// Handles `UPDATE_OFFICE`
pub struct UpdateOfficeHandler;

#[async_trait]
impl CommandHandler for UpdateOfficeHandler {
    fn action(&self) -> Action {
        Action::Update
    }

    fn entity(&self) -> EntityKind {
        EntityKind::Office
    }

    async fn process(
        &self,
        command: &ParsedCommand,
        tx: &mut dyn StoreTx,
    ) -> Result<HandlerOutcome, DomainError> {
        let payload = command.payload();
        payload.reject_unknown(Office::PAYLOAD_FIELDS)?;
        validate_office(payload, false)?;

        let id = command.require_id()?;
        let mut office = tx
            .find_office(id)
            .await?
            .ok_or(DomainError::OfficeNotFound(id))?;

        let changes = office.apply_changes(payload)?;

        if changes.contains("parentId") {
            match payload.get_id("parentId")? {
                Some(parent_id) => {
                    if parent_id == id {
                        return Err(DomainError::validation(
                            "parentId",
                            "an office cannot be its own parent",
                        ));
                    }
                    tx.find_office(parent_id)
                        .await?
                        .ok_or(DomainError::OfficeNotFound(parent_id))?;
                    office.parent_id = Some(parent_id);
                }
                None => office.parent_id = None,
            }
        }

        if changes.contains("code") {
            if let Some(existing) = tx.find_office_by_code(&office.code).await? {
                if existing.id != id {
                    return Err(DomainError::OfficeCodeExists(office.code.clone()));
                }
            }
        }

        if changes.is_empty() {
            // Idempotent no-op: skip the write, the dispatcher still audits
            return Ok(HandlerOutcome::unchanged(id));
        }

        tx.update_office(&office).await?;
        info!(office_id = %id, changed = changes.len(), "Office updated");
        Ok(HandlerOutcome {
            entity_id: id,
            changes,
        })
    }
}

/// Handles `DELETE_OFFICE`
pub struct DeleteOfficeHandler;

#[async_trait]
impl CommandHandler for DeleteOfficeHandler {
    fn action(&self) -> Action {
        Action::Delete
    }

    fn entity(&self) -> EntityKind {
        EntityKind::Office
    }

    async fn process(
        &self,
        command: &ParsedCommand,
        tx: &mut dyn StoreTx,
    ) -> Result<HandlerOutcome, DomainError> {
        let id = command.require_id()?;
        tx.find_office(id)
            .await?
            .ok_or(DomainError::OfficeNotFound(id))?;

        if tx.count_child_offices(id).await? > 0 {
            return Err(DomainError::OfficeHasChildren(id));
        }
        if tx.count_office_users(id).await? > 0 {
            return Err(DomainError::OfficeHasUsers(id));
        }

        tx.delete_office(id).await?;
        info!(office_id = %id, "Office deleted");
        Ok(HandlerOutcome::unchanged(id))
    }
}
