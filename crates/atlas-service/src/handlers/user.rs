//! User command handlers
//!
//! `officeId` and `roleIds` are relationship fields: the entity reports the
//! change and the handler resolves the referenced rows and performs the
//! link.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use atlas_core::command::{Action, EntityKind, ParsedCommand};
use atlas_core::entities::User;
use atlas_core::error::DomainError;
use atlas_core::payload::Payload;
use atlas_core::traits::{ApplyChanges, StoreTx};
use atlas_core::value_objects::{EntityId, EntityIdGenerator};

use crate::dispatch::{CommandHandler, HandlerOutcome};

use super::validation::{check_email, check_length, reject_null, require_field};

fn validate_user(payload: &Payload, creating: bool) -> Result<(), DomainError> {
    if creating {
        require_field(payload, "username")?;
        require_field(payload, "email")?;
    } else {
        reject_null(payload, "username")?;
        reject_null(payload, "email")?;
    }
    check_length(payload, "username", 3, 32)?;
    check_email(payload, "email")?;
    check_length(payload, "displayName", 1, 64)?;
    Ok(())
}

/// Resolve every referenced role or fail with the first missing one
async fn resolve_roles(
    tx: &mut dyn StoreTx,
    role_ids: &[EntityId],
) -> Result<(), DomainError> {
    for role_id in role_ids {
        tx.find_role(*role_id)
            .await?
            .ok_or(DomainError::RoleNotFound(*role_id))?;
    }
    Ok(())
}

/// Handles `CREATE_USER`
pub struct CreateUserHandler {
    ids: Arc<EntityIdGenerator>,
}

impl CreateUserHandler {
    pub fn new(ids: Arc<EntityIdGenerator>) -> Self {
        Self { ids }
    }
}

#[async_trait]
impl CommandHandler for CreateUserHandler {
    fn action(&self) -> Action {
        Action::Create
    }

    fn entity(&self) -> EntityKind {
        EntityKind::User
    }

    async fn process(
        &self,
        command: &ParsedCommand,
        tx: &mut dyn StoreTx,
    ) -> Result<HandlerOutcome, DomainError> {
        let payload = command.payload();
        payload.reject_unknown(User::PAYLOAD_FIELDS)?;
        validate_user(payload, true)?;

        let id = self.ids.generate();
        let mut user = User::new(id, String::new(), String::new());
        user.apply_changes(payload)?;

        if let Some(office_id) = payload.get_id("officeId")? {
            tx.find_office(office_id)
                .await?
                .ok_or(DomainError::OfficeNotFound(office_id))?;
            user.office_id = Some(office_id);
        }

        let role_ids = payload.get_id_set("roleIds")?;
        resolve_roles(tx, &role_ids).await?;
        user.role_ids = role_ids;

        if tx.find_user_by_username(&user.username).await?.is_some() {
            return Err(DomainError::UsernameExists(user.username.clone()));
        }
        if tx.find_user_by_email(&user.email).await?.is_some() {
            return Err(DomainError::EmailExists(user.email.clone()));
        }

        tx.insert_user(&user).await?;
        info!(user_id = %id, username = %user.username, "User created");
        Ok(HandlerOutcome::unchanged(id))
    }
}

/// Handles `UPDATE_USER`
pub struct UpdateUserHandler;

#[async_trait]
impl CommandHandler for UpdateUserHandler {
    fn action(&self) -> Action {
        Action::Update
    }

    fn entity(&self) -> EntityKind {
        EntityKind::User
    }

    async fn process(
        &self,
        command: &ParsedCommand,
        tx: &mut dyn StoreTx,
    ) -> Result<HandlerOutcome, DomainError> {
        let payload = command.payload();
        payload.reject_unknown(User::PAYLOAD_FIELDS)?;
        validate_user(payload, false)?;

        let id = command.require_id()?;
        let mut user = tx
            .find_user(id)
            .await?
            .ok_or(DomainError::UserNotFound(id))?;

        let changes = user.apply_changes(payload)?;

        if changes.contains("officeId") {
            match payload.get_id("officeId")? {
                Some(office_id) => {
                    tx.find_office(office_id)
                        .await?
                        .ok_or(DomainError::OfficeNotFound(office_id))?;
                    user.office_id = Some(office_id);
                }
                None => user.office_id = None,
            }
        }

        if changes.contains("roleIds") {
            let role_ids = payload.get_id_set("roleIds")?;
            resolve_roles(tx, &role_ids).await?;
            user.role_ids = role_ids;
        }

        if changes.contains("username") {
            if let Some(existing) = tx.find_user_by_username(&user.username).await? {
                if existing.id != id {
                    return Err(DomainError::UsernameExists(user.username.clone()));
                }
            }
        }
        if changes.contains("email") {
            if let Some(existing) = tx.find_user_by_email(&user.email).await? {
                if existing.id != id {
                    return Err(DomainError::EmailExists(user.email.clone()));
                }
            }
        }

        if changes.is_empty() {
            return Ok(HandlerOutcome::unchanged(id));
        }

        tx.update_user(&user).await?;
        info!(user_id = %id, changed = changes.len(), "User updated");
        Ok(HandlerOutcome {
            entity_id: id,
            changes,
        })
    }
}

/// Handles `DELETE_USER`
pub struct DeleteUserHandler;

#[async_trait]
impl CommandHandler for DeleteUserHandler {
    fn action(&self) -> Action {
        Action::Delete
    }

    fn entity(&self) -> EntityKind {
        EntityKind::User
    }

    async fn process(
        &self,
        command: &ParsedCommand,
        tx: &mut dyn StoreTx,
    ) -> Result<HandlerOutcome, DomainError> {
        let id = command.require_id()?;
        tx.find_user(id)
            .await?
            .ok_or(DomainError::UserNotFound(id))?;

        tx.delete_user(id).await?;
        info!(user_id = %id, "User deleted");
        Ok(HandlerOutcome::unchanged(id))
    }
}
