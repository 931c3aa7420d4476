//! PostgreSQL implementation of the Store and StoreTx traits
//!
//! Pool-side reads and transactional sessions share the same query helpers,
//! generic over [`PgExecutor`], so the SQL is written once.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgExecutor, PgPool, Postgres, Transaction};
use tracing::instrument;

use atlas_core::entities::{AuditRecord, Office, Role, User};
use atlas_core::error::DomainError;
use atlas_core::traits::{AuditFilter, OfficeFilter, RepoResult, Store, StoreTx, UserFilter};
use atlas_core::value_objects::EntityId;

use crate::mappers::user_with_roles;
use crate::models::{AuditLogModel, OfficeModel, RoleModel, UserModel};

use super::error::{map_db_error, map_unique_violation, map_user_save_error};
use super::{DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};

// ============================================================================
// Shared query helpers
// ============================================================================

async fn office_by_id<'e, E>(executor: E, id: EntityId) -> RepoResult<Option<Office>>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query_as::<_, OfficeModel>(
        r"
        SELECT id, code, name_en, name_kh, phone, latitude, longitude, parent_id,
               created_at, updated_at
        FROM offices
        WHERE id = $1
        ",
    )
    .bind(id.into_inner())
    .fetch_optional(executor)
    .await
    .map_err(map_db_error)?;

    Ok(result.map(Office::from))
}

async fn office_by_code<'e, E>(executor: E, code: &str) -> RepoResult<Option<Office>>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query_as::<_, OfficeModel>(
        r"
        SELECT id, code, name_en, name_kh, phone, latitude, longitude, parent_id,
               created_at, updated_at
        FROM offices
        WHERE code = $1
        ",
    )
    .bind(code)
    .fetch_optional(executor)
    .await
    .map_err(map_db_error)?;

    Ok(result.map(Office::from))
}

async fn user_model_by_id<'e, E>(executor: E, id: EntityId) -> RepoResult<Option<UserModel>>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, UserModel>(
        r"
        SELECT id, username, email, display_name, enabled, office_id, created_at, updated_at
        FROM users
        WHERE id = $1
        ",
    )
    .bind(id.into_inner())
    .fetch_optional(executor)
    .await
    .map_err(map_db_error)
}

async fn user_model_by_username<'e, E>(executor: E, username: &str) -> RepoResult<Option<UserModel>>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, UserModel>(
        r"
        SELECT id, username, email, display_name, enabled, office_id, created_at, updated_at
        FROM users
        WHERE username = $1
        ",
    )
    .bind(username)
    .fetch_optional(executor)
    .await
    .map_err(map_db_error)
}

async fn user_model_by_email<'e, E>(executor: E, email: &str) -> RepoResult<Option<UserModel>>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, UserModel>(
        r"
        SELECT id, username, email, display_name, enabled, office_id, created_at, updated_at
        FROM users
        WHERE email = $1
        ",
    )
    .bind(email)
    .fetch_optional(executor)
    .await
    .map_err(map_db_error)
}

/// Load role IDs linked to one user, in canonical (ascending) order
async fn role_ids_for_user<'e, E>(executor: E, user_id: i64) -> RepoResult<Vec<i64>>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar::<_, i64>(
        r"
        SELECT role_id FROM user_roles WHERE user_id = $1 ORDER BY role_id
        ",
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
    .map_err(map_db_error)
}

async fn role_by_id<'e, E>(executor: E, id: EntityId) -> RepoResult<Option<Role>>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query_as::<_, RoleModel>(
        r"
        SELECT id, name, description, permissions, created_at, updated_at
        FROM roles
        WHERE id = $1
        ",
    )
    .bind(id.into_inner())
    .fetch_optional(executor)
    .await
    .map_err(map_db_error)?;

    Ok(result.map(Role::from))
}

async fn role_by_name<'e, E>(executor: E, name: &str) -> RepoResult<Option<Role>>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query_as::<_, RoleModel>(
        r"
        SELECT id, name, description, permissions, created_at, updated_at
        FROM roles
        WHERE name = $1
        ",
    )
    .bind(name)
    .fetch_optional(executor)
    .await
    .map_err(map_db_error)?;

    Ok(result.map(Role::from))
}

// ============================================================================
// PgStore - pool-side reads and transaction entry
// ============================================================================

/// PostgreSQL implementation of [`Store`]
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a new PgStore
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    #[instrument(skip(self))]
    async fn begin(&self) -> RepoResult<Box<dyn StoreTx>> {
        let tx = self.pool.begin().await.map_err(map_db_error)?;
        Ok(Box::new(PgStoreTx { tx }))
    }

    #[instrument(skip(self))]
    async fn find_office(&self, id: EntityId) -> RepoResult<Option<Office>> {
        office_by_id(&self.pool, id).await
    }

    #[instrument(skip(self))]
    async fn list_offices(&self, filter: OfficeFilter) -> RepoResult<Vec<Office>> {
        let limit = filter
            .limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT);

        let results = match filter.parent_id {
            Some(parent_id) => {
                sqlx::query_as::<_, OfficeModel>(
                    r"
                    SELECT id, code, name_en, name_kh, phone, latitude, longitude, parent_id,
                           created_at, updated_at
                    FROM offices
                    WHERE parent_id = $1
                    ORDER BY code
                    LIMIT $2
                    ",
                )
                .bind(parent_id.into_inner())
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, OfficeModel>(
                    r"
                    SELECT id, code, name_en, name_kh, phone, latitude, longitude, parent_id,
                           created_at, updated_at
                    FROM offices
                    ORDER BY code
                    LIMIT $1
                    ",
                )
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Office::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_user(&self, id: EntityId) -> RepoResult<Option<User>> {
        match user_model_by_id(&self.pool, id).await? {
            Some(model) => {
                let role_ids = role_ids_for_user(&self.pool, model.id).await?;
                Ok(Some(user_with_roles(model, role_ids)))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    async fn list_users(&self, filter: UserFilter) -> RepoResult<Vec<User>> {
        let limit = filter
            .limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT);

        let models = match filter.office_id {
            Some(office_id) => {
                sqlx::query_as::<_, UserModel>(
                    r"
                    SELECT id, username, email, display_name, enabled, office_id,
                           created_at, updated_at
                    FROM users
                    WHERE office_id = $1
                    ORDER BY username
                    LIMIT $2
                    ",
                )
                .bind(office_id.into_inner())
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, UserModel>(
                    r"
                    SELECT id, username, email, display_name, enabled, office_id,
                           created_at, updated_at
                    FROM users
                    ORDER BY username
                    LIMIT $1
                    ",
                )
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(map_db_error)?;

        if models.is_empty() {
            return Ok(Vec::new());
        }

        // One batched link-table query instead of one per user
        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let links = sqlx::query_as::<_, (i64, i64)>(
            r"
            SELECT user_id, role_id FROM user_roles
            WHERE user_id = ANY($1)
            ORDER BY user_id, role_id
            ",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let mut by_user: HashMap<i64, Vec<i64>> = HashMap::new();
        for (user_id, role_id) in links {
            by_user.entry(user_id).or_default().push(role_id);
        }

        Ok(models
            .into_iter()
            .map(|model| {
                let role_ids = by_user.remove(&model.id).unwrap_or_default();
                user_with_roles(model, role_ids)
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn find_role(&self, id: EntityId) -> RepoResult<Option<Role>> {
        role_by_id(&self.pool, id).await
    }

    #[instrument(skip(self))]
    async fn list_roles(&self) -> RepoResult<Vec<Role>> {
        let results = sqlx::query_as::<_, RoleModel>(
            r"
            SELECT id, name, description, permissions, created_at, updated_at
            FROM roles
            ORDER BY name
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Role::from).collect())
    }

    #[instrument(skip(self))]
    async fn list_audits(&self, filter: AuditFilter) -> RepoResult<Vec<AuditRecord>> {
        let limit = filter
            .limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT);
        let entity = filter.entity.map(|e| e.as_str());
        let entity_id = filter.entity_id.map(EntityId::into_inner);

        let results = sqlx::query_as::<_, AuditLogModel>(
            r"
            SELECT id, entity_id, action, entity, href, json, created_by, created_at
            FROM audit_logs
            WHERE ($1::TEXT IS NULL OR entity = $1)
              AND ($2::BIGINT IS NULL OR entity_id = $2)
            ORDER BY id DESC
            LIMIT $3
            ",
        )
        .bind(entity)
        .bind(entity_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(AuditRecord::from).collect())
    }
}

// ============================================================================
// PgStoreTx - one transaction per dispatch
// ============================================================================

/// One open PostgreSQL transaction
///
/// Dropping the value without committing rolls the transaction back.
pub struct PgStoreTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTx for PgStoreTx {
    async fn find_office(&mut self, id: EntityId) -> RepoResult<Option<Office>> {
        office_by_id(&mut *self.tx, id).await
    }

    async fn find_office_by_code(&mut self, code: &str) -> RepoResult<Option<Office>> {
        office_by_code(&mut *self.tx, code).await
    }

    async fn count_child_offices(&mut self, parent_id: EntityId) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM offices WHERE parent_id = $1
            ",
        )
        .bind(parent_id.into_inner())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_db_error)
    }

    async fn count_office_users(&mut self, office_id: EntityId) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM users WHERE office_id = $1
            ",
        )
        .bind(office_id.into_inner())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_db_error)
    }

    async fn find_user(&mut self, id: EntityId) -> RepoResult<Option<User>> {
        match user_model_by_id(&mut *self.tx, id).await? {
            Some(model) => {
                let role_ids = role_ids_for_user(&mut *self.tx, model.id).await?;
                Ok(Some(user_with_roles(model, role_ids)))
            }
            None => Ok(None),
        }
    }

    async fn find_user_by_username(&mut self, username: &str) -> RepoResult<Option<User>> {
        match user_model_by_username(&mut *self.tx, username).await? {
            Some(model) => {
                let role_ids = role_ids_for_user(&mut *self.tx, model.id).await?;
                Ok(Some(user_with_roles(model, role_ids)))
            }
            None => Ok(None),
        }
    }

    async fn find_user_by_email(&mut self, email: &str) -> RepoResult<Option<User>> {
        match user_model_by_email(&mut *self.tx, email).await? {
            Some(model) => {
                let role_ids = role_ids_for_user(&mut *self.tx, model.id).await?;
                Ok(Some(user_with_roles(model, role_ids)))
            }
            None => Ok(None),
        }
    }

    async fn find_role(&mut self, id: EntityId) -> RepoResult<Option<Role>> {
        role_by_id(&mut *self.tx, id).await
    }

    async fn find_role_by_name(&mut self, name: &str) -> RepoResult<Option<Role>> {
        role_by_name(&mut *self.tx, name).await
    }

    async fn count_role_users(&mut self, role_id: EntityId) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM user_roles WHERE role_id = $1
            ",
        )
        .bind(role_id.into_inner())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_db_error)
    }

    async fn insert_office(&mut self, office: &Office) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO offices (id, code, name_en, name_kh, phone, latitude, longitude,
                                 parent_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(office.id.into_inner())
        .bind(&office.code)
        .bind(&office.name_en)
        .bind(&office.name_kh)
        .bind(&office.phone)
        .bind(office.latitude)
        .bind(office.longitude)
        .bind(office.parent_id.map(EntityId::into_inner))
        .bind(office.created_at)
        .bind(office.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| {
            map_unique_violation(e, || DomainError::OfficeCodeExists(office.code.clone()))
        })?;

        Ok(())
    }

    async fn update_office(&mut self, office: &Office) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE offices
            SET code = $2, name_en = $3, name_kh = $4, phone = $5, latitude = $6,
                longitude = $7, parent_id = $8, updated_at = $9
            WHERE id = $1
            ",
        )
        .bind(office.id.into_inner())
        .bind(&office.code)
        .bind(&office.name_en)
        .bind(&office.name_kh)
        .bind(&office.phone)
        .bind(office.latitude)
        .bind(office.longitude)
        .bind(office.parent_id.map(EntityId::into_inner))
        .bind(office.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| {
            map_unique_violation(e, || DomainError::OfficeCodeExists(office.code.clone()))
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::OfficeNotFound(office.id));
        }

        Ok(())
    }

    async fn delete_office(&mut self, id: EntityId) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            DELETE FROM offices WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::OfficeNotFound(id));
        }

        Ok(())
    }

    async fn insert_user(&mut self, user: &User) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO users (id, username, email, display_name, enabled, office_id,
                               created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(user.id.into_inner())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(user.enabled)
        .bind(user.office_id.map(EntityId::into_inner))
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_user_save_error(e, &user.username, &user.email))?;

        for role_id in &user.role_ids {
            sqlx::query(
                r"
                INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2)
                ",
            )
            .bind(user.id.into_inner())
            .bind(role_id.into_inner())
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;
        }

        Ok(())
    }

    async fn update_user(&mut self, user: &User) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET username = $2, email = $3, display_name = $4, enabled = $5,
                office_id = $6, updated_at = $7
            WHERE id = $1
            ",
        )
        .bind(user.id.into_inner())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(user.enabled)
        .bind(user.office_id.map(EntityId::into_inner))
        .bind(user.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_user_save_error(e, &user.username, &user.email))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::UserNotFound(user.id));
        }

        // Rewrite role links from scratch
        sqlx::query(
            r"
            DELETE FROM user_roles WHERE user_id = $1
            ",
        )
        .bind(user.id.into_inner())
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        for role_id in &user.role_ids {
            sqlx::query(
                r"
                INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2)
                ",
            )
            .bind(user.id.into_inner())
            .bind(role_id.into_inner())
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;
        }

        Ok(())
    }

    async fn delete_user(&mut self, id: EntityId) -> RepoResult<()> {
        sqlx::query(
            r"
            DELETE FROM user_roles WHERE user_id = $1
            ",
        )
        .bind(id.into_inner())
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        let result = sqlx::query(
            r"
            DELETE FROM users WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::UserNotFound(id));
        }

        Ok(())
    }

    async fn insert_role(&mut self, role: &Role) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO roles (id, name, description, permissions, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(role.id.into_inner())
        .bind(&role.name)
        .bind(&role.description)
        .bind(&role.permissions)
        .bind(role.created_at)
        .bind(role.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::RoleNameExists(role.name.clone())))?;

        Ok(())
    }

    async fn update_role(&mut self, role: &Role) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE roles
            SET name = $2, description = $3, permissions = $4, updated_at = $5
            WHERE id = $1
            ",
        )
        .bind(role.id.into_inner())
        .bind(&role.name)
        .bind(&role.description)
        .bind(&role.permissions)
        .bind(role.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::RoleNameExists(role.name.clone())))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::RoleNotFound(role.id));
        }

        Ok(())
    }

    async fn delete_role(&mut self, id: EntityId) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            DELETE FROM roles WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::RoleNotFound(id));
        }

        Ok(())
    }

    async fn insert_audit(&mut self, record: &AuditRecord) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO audit_logs (entity_id, action, entity, href, json, created_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(record.entity_id.into_inner())
        .bind(&record.action)
        .bind(&record.entity)
        .bind(&record.href)
        .bind(&record.json)
        .bind(&record.created_by)
        .bind(record.created_at)
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    async fn commit(self: Box<Self>) -> RepoResult<()> {
        self.tx.commit().await.map_err(map_db_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgStore>();
    }

    #[test]
    fn test_tx_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<PgStoreTx>();
    }
}
