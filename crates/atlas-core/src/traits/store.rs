//! Store traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Mutations run inside a [`StoreTx`] session so
//! the business write and the audit write share one transaction.

use async_trait::async_trait;

use crate::command::EntityKind;
use crate::entities::{AuditRecord, Office, Role, User};
use crate::error::DomainError;
use crate::value_objects::EntityId;

/// Result type for store operations
pub type RepoResult<T> = Result<T, DomainError>;

/// Filter for office listings
#[derive(Debug, Clone, Copy, Default)]
pub struct OfficeFilter {
    pub parent_id: Option<EntityId>,
    pub limit: Option<i64>,
}

/// Filter for user listings
#[derive(Debug, Clone, Copy, Default)]
pub struct UserFilter {
    pub office_id: Option<EntityId>,
    pub limit: Option<i64>,
}

/// Filter for audit-trail listings (newest first)
#[derive(Debug, Clone, Copy, Default)]
pub struct AuditFilter {
    pub entity: Option<EntityKind>,
    pub entity_id: Option<EntityId>,
    pub limit: Option<i64>,
}

// ============================================================================
// Store - pool-side reads and transaction entry
// ============================================================================

#[async_trait]
pub trait Store: Send + Sync {
    /// Open a transactional session covering mutation and audit writes
    async fn begin(&self) -> RepoResult<Box<dyn StoreTx>>;

    /// Find office by ID
    async fn find_office(&self, id: EntityId) -> RepoResult<Option<Office>>;

    /// List offices, optionally under one parent
    async fn list_offices(&self, filter: OfficeFilter) -> RepoResult<Vec<Office>>;

    /// Find user by ID (roles included)
    async fn find_user(&self, id: EntityId) -> RepoResult<Option<User>>;

    /// List users, optionally scoped to one office
    async fn list_users(&self, filter: UserFilter) -> RepoResult<Vec<User>>;

    /// Find role by ID
    async fn find_role(&self, id: EntityId) -> RepoResult<Option<Role>>;

    /// List all roles
    async fn list_roles(&self) -> RepoResult<Vec<Role>>;

    /// List audit rows, newest first
    async fn list_audits(&self, filter: AuditFilter) -> RepoResult<Vec<AuditRecord>>;
}

// ============================================================================
// StoreTx - one transaction per dispatch
// ============================================================================

/// A single open transaction
///
/// Dropping the session without calling [`StoreTx::commit`] rolls back every
/// write made through it.
#[async_trait]
pub trait StoreTx: Send {
    // ------------------------------------------------------------- reads

    /// Find office by ID
    async fn find_office(&mut self, id: EntityId) -> RepoResult<Option<Office>>;

    /// Find office by its unique code
    async fn find_office_by_code(&mut self, code: &str) -> RepoResult<Option<Office>>;

    /// Count offices directly under a parent
    async fn count_child_offices(&mut self, parent_id: EntityId) -> RepoResult<i64>;

    /// Count users assigned to an office
    async fn count_office_users(&mut self, office_id: EntityId) -> RepoResult<i64>;

    /// Find user by ID (roles included)
    async fn find_user(&mut self, id: EntityId) -> RepoResult<Option<User>>;

    /// Find user by unique username
    async fn find_user_by_username(&mut self, username: &str) -> RepoResult<Option<User>>;

    /// Find user by unique email
    async fn find_user_by_email(&mut self, email: &str) -> RepoResult<Option<User>>;

    /// Find role by ID
    async fn find_role(&mut self, id: EntityId) -> RepoResult<Option<Role>>;

    /// Find role by its unique name
    async fn find_role_by_name(&mut self, name: &str) -> RepoResult<Option<Role>>;

    /// Count users holding a role
    async fn count_role_users(&mut self, role_id: EntityId) -> RepoResult<i64>;

    // ------------------------------------------------------------ writes

    /// Insert a new office
    async fn insert_office(&mut self, office: &Office) -> RepoResult<()>;

    /// Update an existing office
    async fn update_office(&mut self, office: &Office) -> RepoResult<()>;

    /// Delete an office
    async fn delete_office(&mut self, id: EntityId) -> RepoResult<()>;

    /// Insert a new user with its role links
    async fn insert_user(&mut self, user: &User) -> RepoResult<()>;

    /// Update an existing user, rewriting its role links
    async fn update_user(&mut self, user: &User) -> RepoResult<()>;

    /// Delete a user and its role links
    async fn delete_user(&mut self, id: EntityId) -> RepoResult<()>;

    /// Insert a new role
    async fn insert_role(&mut self, role: &Role) -> RepoResult<()>;

    /// Update an existing role
    async fn update_role(&mut self, role: &Role) -> RepoResult<()>;

    /// Delete a role
    async fn delete_role(&mut self, id: EntityId) -> RepoResult<()>;

    /// Append one audit row
    async fn insert_audit(&mut self, record: &AuditRecord) -> RepoResult<()>;

    // ------------------------------------------------------------ commit

    /// Commit every write made through this session
    async fn commit(self: Box<Self>) -> RepoResult<()>;
}
