//! Role command handlers

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use atlas_core::command::{Action, EntityKind, ParsedCommand};
use atlas_core::entities::Role;
use atlas_core::error::DomainError;
use atlas_core::payload::Payload;
use atlas_core::traits::{ApplyChanges, StoreTx};
use atlas_core::value_objects::EntityIdGenerator;

use crate::dispatch::{CommandHandler, HandlerOutcome};

use super::validation::{check_length, reject_null, require_field};

fn validate_role(payload: &Payload, creating: bool) -> Result<(), DomainError> {
    if creating {
        require_field(payload, "name")?;
    } else {
        reject_null(payload, "name")?;
    }
    check_length(payload, "name", 2, 64)?;
    check_length(payload, "description", 1, 255)?;

    // Permission keys are ACTION_ENTITY strings; empty entries are noise
    for permission in payload.get_str_array("permissions")? {
        if permission.trim().is_empty() {
            return Err(DomainError::validation(
                "permissions",
                "entries must not be blank",
            ));
        }
    }
    Ok(())
}

/// Handles `CREATE_ROLE`
pub struct CreateRoleHandler {
    ids: Arc<EntityIdGenerator>,
}

impl CreateRoleHandler {
    pub fn new(ids: Arc<EntityIdGenerator>) -> Self {
        Self { ids }
    }
}

#[async_trait]
impl CommandHandler for CreateRoleHandler {
    fn action(&self) -> Action {
        Action::Create
    }

    fn entity(&self) -> EntityKind {
        EntityKind::Role
    }

    async fn process(
        &self,
        command: &ParsedCommand,
        tx: &mut dyn StoreTx,
    ) -> Result<HandlerOutcome, DomainError> {
        let payload = command.payload();
        payload.reject_unknown(Role::PAYLOAD_FIELDS)?;
        validate_role(payload, true)?;

        let id = self.ids.generate();
        let mut role = Role::new(id, String::new());
        role.apply_changes(payload)?;

        if tx.find_role_by_name(&role.name).await?.is_some() {
            return Err(DomainError::RoleNameExists(role.name.clone()));
        }

        tx.insert_role(&role).await?;
        info!(role_id = %id, name = %role.name, "Role created");
        Ok(HandlerOutcome::unchanged(id))
    }
}

/// Handles `UPDATE_ROLE`
pub struct UpdateRoleHandler;

#[async_trait]
impl CommandHandler for UpdateRoleHandler {
    fn action(&self) -> Action {
        Action::Update
    }

    fn entity(&self) -> EntityKind {
        EntityKind::Role
    }

    async fn process(
        &self,
        command: &ParsedCommand,
        tx: &mut dyn StoreTx,
    ) -> Result<HandlerOutcome, DomainError> {
        let payload = command.payload();
        payload.reject_unknown(Role::PAYLOAD_FIELDS)?;
        validate_role(payload, false)?;

        let id = command.require_id()?;
        let mut role = tx
            .find_role(id)
            .await?
            .ok_or(DomainError::RoleNotFound(id))?;

        let changes = role.apply_changes(payload)?;

        if changes.contains("name") {
            if let Some(existing) = tx.find_role_by_name(&role.name).await? {
                if existing.id != id {
                    return Err(DomainError::RoleNameExists(role.name.clone()));
                }
            }
        }

        if changes.is_empty() {
            return Ok(HandlerOutcome::unchanged(id));
        }

        tx.update_role(&role).await?;
        info!(role_id = %id, changed = changes.len(), "Role updated");
        Ok(HandlerOutcome {
            entity_id: id,
            changes,
        })
    }
}

/// Handles `DELETE_ROLE`
pub struct DeleteRoleHandler;

#[async_trait]
impl CommandHandler for DeleteRoleHandler {
    fn action(&self) -> Action {
        Action::Delete
    }

    fn entity(&self) -> EntityKind {
        EntityKind::Role
    }

    async fn process(
        &self,
        command: &ParsedCommand,
        tx: &mut dyn StoreTx,
    ) -> Result<HandlerOutcome, DomainError> {
        let id = command.require_id()?;
        tx.find_role(id)
            .await?
            .ok_or(DomainError::RoleNotFound(id))?;

        if tx.count_role_users(id).await? > 0 {
            return Err(DomainError::RoleInUse(id));
        }

        tx.delete_role(id).await?;
        info!(role_id = %id, "Role deleted");
        Ok(HandlerOutcome::unchanged(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_core::command::Command;
    use atlas_core::entities::User;
    use atlas_core::traits::Store;
    use atlas_core::value_objects::EntityId;
    use atlas_db::MemoryStore;
    use serde_json::json;

    fn ids() -> Arc<EntityIdGenerator> {
        Arc::new(EntityIdGenerator::new(0))
    }

    fn create_cmd(payload: &str) -> ParsedCommand {
        ParsedCommand::parse(Command::create(EntityKind::Role, "/api/v1/roles", payload))
            .unwrap()
    }

    fn update_cmd(id: EntityId, payload: &str) -> ParsedCommand {
        ParsedCommand::parse(Command::update(
            id,
            EntityKind::Role,
            format!("/api/v1/roles/{id}"),
            payload,
        ))
        .unwrap()
    }

    async fn seed_role(store: &MemoryStore, id: i64, name: &str) -> EntityId {
        let role = Role::new(EntityId::new(id), name.to_string());
        let mut tx = store.begin().await.unwrap();
        tx.insert_role(&role).await.unwrap();
        tx.commit().await.unwrap();
        role.id
    }

    #[tokio::test]
    async fn test_create_role_with_permissions() {
        let store = MemoryStore::new();
        let handler = CreateRoleHandler::new(ids());
        let cmd = create_cmd(r#"{"name":"auditor","permissions":["CREATE_OFFICE","UPDATE_OFFICE"]}"#);

        let mut tx = store.begin().await.unwrap();
        let outcome = handler.process(&cmd, tx.as_mut()).await.unwrap();
        tx.commit().await.unwrap();

        let role = store.find_role(outcome.entity_id).await.unwrap().unwrap();
        assert_eq!(role.name, "auditor");
        assert!(role.grants("CREATE_OFFICE"));
    }

    #[tokio::test]
    async fn test_create_role_duplicate_name() {
        let store = MemoryStore::new();
        seed_role(&store, 1, "admin").await;
        let handler = CreateRoleHandler::new(ids());

        let mut tx = store.begin().await.unwrap();
        let err = handler
            .process(&create_cmd(r#"{"name":"admin"}"#), tx.as_mut())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::RoleNameExists(_)));
    }

    #[tokio::test]
    async fn test_create_role_blank_permission_rejected() {
        let store = MemoryStore::new();
        let handler = CreateRoleHandler::new(ids());
        let cmd = create_cmd(r#"{"name":"auditor","permissions":["  "]}"#);

        let mut tx = store.begin().await.unwrap();
        let err = handler.process(&cmd, tx.as_mut()).await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationFailed { .. }));
    }

    #[tokio::test]
    async fn test_update_role_permissions() {
        let store = MemoryStore::new();
        let id = seed_role(&store, 1, "auditor").await;
        let handler = UpdateRoleHandler;

        let mut tx = store.begin().await.unwrap();
        let outcome = handler
            .process(
                &update_cmd(id, r#"{"permissions":["DELETE_OFFICE"]}"#),
                tx.as_mut(),
            )
            .await
            .unwrap();
        tx.commit().await.unwrap();

        assert_eq!(
            outcome.changes.get("permissions"),
            Some(&json!(["DELETE_OFFICE"]))
        );
        let role = store.find_role(id).await.unwrap().unwrap();
        assert!(role.grants("DELETE_OFFICE"));
    }

    #[tokio::test]
    async fn test_update_role_noop_skips_write() {
        let store = MemoryStore::new();
        let id = seed_role(&store, 1, "auditor").await;
        let before = store.find_role(id).await.unwrap().unwrap();
        let handler = UpdateRoleHandler;

        let mut tx = store.begin().await.unwrap();
        let outcome = handler
            .process(&update_cmd(id, r#"{"name":"auditor"}"#), tx.as_mut())
            .await
            .unwrap();
        tx.commit().await.unwrap();

        assert!(outcome.changes.is_empty());
        let after = store.find_role(id).await.unwrap().unwrap();
        assert_eq!(after.updated_at, before.updated_at);
    }

    #[tokio::test]
    async fn test_delete_role_in_use_refused() {
        let store = MemoryStore::new();
        let id = seed_role(&store, 1, "admin").await;
        let mut user = User::new(
            EntityId::new(10),
            "sokha".to_string(),
            "sokha@example.com".to_string(),
        );
        user.role_ids.push(id);
        let mut tx = store.begin().await.unwrap();
        tx.insert_user(&user).await.unwrap();
        tx.commit().await.unwrap();

        let handler = DeleteRoleHandler;
        let cmd = ParsedCommand::parse(Command::delete(
            id,
            EntityKind::Role,
            format!("/api/v1/roles/{id}"),
        ))
        .unwrap();

        let mut tx = store.begin().await.unwrap();
        let err = handler.process(&cmd, tx.as_mut()).await.unwrap_err();
        assert!(matches!(err, DomainError::RoleInUse(_)));
    }

    #[tokio::test]
    async fn test_delete_unassigned_role() {
        let store = MemoryStore::new();
        let id = seed_role(&store, 1, "admin").await;
        let handler = DeleteRoleHandler;
        let cmd = ParsedCommand::parse(Command::delete(
            id,
            EntityKind::Role,
            format!("/api/v1/roles/{id}"),
        ))
        .unwrap();

        let mut tx = store.begin().await.unwrap();
        handler.process(&cmd, tx.as_mut()).await.unwrap();
        tx.commit().await.unwrap();

        assert!(store.find_role(id).await.unwrap().is_none());
    }
}
