//! Query service - the read side of the API
//!
//! Reads run against the store's pool-side API, outside the dispatch
//! funnel; they take no transaction and write no audit rows.

use tracing::instrument;

use atlas_core::error::DomainError;
use atlas_core::traits::{AuditFilter, OfficeFilter, UserFilter};
use atlas_core::value_objects::EntityId;

use crate::dto::{AuditResponse, OfficeResponse, RoleResponse, UserResponse};

use super::context::ServiceContext;

/// Read-only lookups over offices, users, roles, and the audit trail
pub struct QueryService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> QueryService<'a> {
    /// Create a new QueryService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Fetch one office
    #[instrument(skip(self))]
    pub async fn get_office(&self, id: EntityId) -> Result<OfficeResponse, DomainError> {
        let office = self
            .ctx
            .store()
            .find_office(id)
            .await?
            .ok_or(DomainError::OfficeNotFound(id))?;
        Ok(OfficeResponse::from(&office))
    }

    /// List offices, optionally under one parent
    #[instrument(skip(self))]
    pub async fn list_offices(
        &self,
        filter: OfficeFilter,
    ) -> Result<Vec<OfficeResponse>, DomainError> {
        let offices = self.ctx.store().list_offices(filter).await?;
        Ok(offices.iter().map(OfficeResponse::from).collect())
    }

    /// Fetch one user
    #[instrument(skip(self))]
    pub async fn get_user(&self, id: EntityId) -> Result<UserResponse, DomainError> {
        let user = self
            .ctx
            .store()
            .find_user(id)
            .await?
            .ok_or(DomainError::UserNotFound(id))?;
        Ok(UserResponse::from(&user))
    }

    /// List users, optionally scoped to one office
    #[instrument(skip(self))]
    pub async fn list_users(&self, filter: UserFilter) -> Result<Vec<UserResponse>, DomainError> {
        let users = self.ctx.store().list_users(filter).await?;
        Ok(users.iter().map(UserResponse::from).collect())
    }

    /// Fetch one role
    #[instrument(skip(self))]
    pub async fn get_role(&self, id: EntityId) -> Result<RoleResponse, DomainError> {
        let role = self
            .ctx
            .store()
            .find_role(id)
            .await?
            .ok_or(DomainError::RoleNotFound(id))?;
        Ok(RoleResponse::from(&role))
    }

    /// List all roles
    #[instrument(skip(self))]
    pub async fn list_roles(&self) -> Result<Vec<RoleResponse>, DomainError> {
        let roles = self.ctx.store().list_roles().await?;
        Ok(roles.iter().map(RoleResponse::from).collect())
    }

    /// List audit rows, newest first
    #[instrument(skip(self))]
    pub async fn list_audits(
        &self,
        filter: AuditFilter,
    ) -> Result<Vec<AuditResponse>, DomainError> {
        let audits = self.ctx.store().list_audits(filter).await?;
        Ok(audits.iter().map(AuditResponse::from).collect())
    }
}
