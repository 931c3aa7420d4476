//! In-memory implementation of the Store and StoreTx traits
//!
//! Backs tests and local development without a PostgreSQL instance. Sessions
//! buffer their writes and apply them on commit under one lock, so dropping a
//! session without committing discards everything it wrote, matching the
//! transaction semantics of the PostgreSQL store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use atlas_core::entities::{AuditRecord, Office, Role, User};
use atlas_core::error::DomainError;
use atlas_core::traits::{AuditFilter, OfficeFilter, RepoResult, Store, StoreTx, UserFilter};
use atlas_core::value_objects::EntityId;

use super::{DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};

#[derive(Debug, Default)]
struct Tables {
    offices: HashMap<i64, Office>,
    users: HashMap<i64, User>,
    roles: HashMap<i64, Role>,
    audits: Vec<AuditRecord>,
}

/// In-memory implementation of [`Store`]
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> RepoResult<Box<dyn StoreTx>> {
        Ok(Box::new(MemoryStoreTx {
            tables: Arc::clone(&self.tables),
            writes: Vec::new(),
        }))
    }

    async fn find_office(&self, id: EntityId) -> RepoResult<Option<Office>> {
        Ok(self.tables.read().offices.get(&id.into_inner()).cloned())
    }

    async fn list_offices(&self, filter: OfficeFilter) -> RepoResult<Vec<Office>> {
        let limit = filter
            .limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT) as usize;

        let mut offices: Vec<Office> = {
            let tables = self.tables.read();
            tables
                .offices
                .values()
                .filter(|o| filter.parent_id.map_or(true, |p| o.parent_id == Some(p)))
                .cloned()
                .collect()
        };
        offices.sort_by(|a, b| a.code.cmp(&b.code));
        offices.truncate(limit);
        Ok(offices)
    }

    async fn find_user(&self, id: EntityId) -> RepoResult<Option<User>> {
        Ok(self.tables.read().users.get(&id.into_inner()).cloned())
    }

    async fn list_users(&self, filter: UserFilter) -> RepoResult<Vec<User>> {
        let limit = filter
            .limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT) as usize;

        let mut users: Vec<User> = {
            let tables = self.tables.read();
            tables
                .users
                .values()
                .filter(|u| filter.office_id.map_or(true, |o| u.office_id == Some(o)))
                .cloned()
                .collect()
        };
        users.sort_by(|a, b| a.username.cmp(&b.username));
        users.truncate(limit);
        Ok(users)
    }

    async fn find_role(&self, id: EntityId) -> RepoResult<Option<Role>> {
        Ok(self.tables.read().roles.get(&id.into_inner()).cloned())
    }

    async fn list_roles(&self) -> RepoResult<Vec<Role>> {
        let mut roles: Vec<Role> = self.tables.read().roles.values().cloned().collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roles)
    }

    async fn list_audits(&self, filter: AuditFilter) -> RepoResult<Vec<AuditRecord>> {
        let limit = filter
            .limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT) as usize;
        let entity = filter.entity.map(|e| e.as_str());

        // Rows were appended in commit order, so newest first is a reverse scan
        let tables = self.tables.read();
        let audits = tables
            .audits
            .iter()
            .rev()
            .filter(|r| entity.map_or(true, |e| r.entity == e))
            .filter(|r| filter.entity_id.map_or(true, |id| r.entity_id == id))
            .take(limit)
            .cloned()
            .collect();
        Ok(audits)
    }
}

// ============================================================================
// MemoryStoreTx - buffered writes, applied on commit
// ============================================================================

#[derive(Debug, Clone)]
enum Write {
    InsertOffice(Office),
    UpdateOffice(Office),
    DeleteOffice(EntityId),
    InsertUser(User),
    UpdateUser(User),
    DeleteUser(EntityId),
    InsertRole(Role),
    UpdateRole(Role),
    DeleteRole(EntityId),
    InsertAudit(AuditRecord),
}

struct MemoryStoreTx {
    tables: Arc<RwLock<Tables>>,
    writes: Vec<Write>,
}

impl MemoryStoreTx {
    /// Base table with this session's buffered writes replayed on top
    fn effective_offices(&self) -> HashMap<i64, Office> {
        let mut offices = self.tables.read().offices.clone();
        for write in &self.writes {
            match write {
                Write::InsertOffice(o) | Write::UpdateOffice(o) => {
                    offices.insert(o.id.into_inner(), o.clone());
                }
                Write::DeleteOffice(id) => {
                    offices.remove(&id.into_inner());
                }
                _ => {}
            }
        }
        offices
    }

    fn effective_users(&self) -> HashMap<i64, User> {
        let mut users = self.tables.read().users.clone();
        for write in &self.writes {
            match write {
                Write::InsertUser(u) | Write::UpdateUser(u) => {
                    users.insert(u.id.into_inner(), u.clone());
                }
                Write::DeleteUser(id) => {
                    users.remove(&id.into_inner());
                }
                _ => {}
            }
        }
        users
    }

    fn effective_roles(&self) -> HashMap<i64, Role> {
        let mut roles = self.tables.read().roles.clone();
        for write in &self.writes {
            match write {
                Write::InsertRole(r) | Write::UpdateRole(r) => {
                    roles.insert(r.id.into_inner(), r.clone());
                }
                Write::DeleteRole(id) => {
                    roles.remove(&id.into_inner());
                }
                _ => {}
            }
        }
        roles
    }
}

#[async_trait]
impl StoreTx for MemoryStoreTx {
    async fn find_office(&mut self, id: EntityId) -> RepoResult<Option<Office>> {
        Ok(self.effective_offices().remove(&id.into_inner()))
    }

    async fn find_office_by_code(&mut self, code: &str) -> RepoResult<Option<Office>> {
        Ok(self
            .effective_offices()
            .into_values()
            .find(|o| o.code == code))
    }

    async fn count_child_offices(&mut self, parent_id: EntityId) -> RepoResult<i64> {
        let count = self
            .effective_offices()
            .values()
            .filter(|o| o.parent_id == Some(parent_id))
            .count();
        Ok(count as i64)
    }

    async fn count_office_users(&mut self, office_id: EntityId) -> RepoResult<i64> {
        let count = self
            .effective_users()
            .values()
            .filter(|u| u.office_id == Some(office_id))
            .count();
        Ok(count as i64)
    }

    async fn find_user(&mut self, id: EntityId) -> RepoResult<Option<User>> {
        Ok(self.effective_users().remove(&id.into_inner()))
    }

    async fn find_user_by_username(&mut self, username: &str) -> RepoResult<Option<User>> {
        Ok(self
            .effective_users()
            .into_values()
            .find(|u| u.username == username))
    }

    async fn find_user_by_email(&mut self, email: &str) -> RepoResult<Option<User>> {
        Ok(self
            .effective_users()
            .into_values()
            .find(|u| u.email == email))
    }

    async fn find_role(&mut self, id: EntityId) -> RepoResult<Option<Role>> {
        Ok(self.effective_roles().remove(&id.into_inner()))
    }

    async fn find_role_by_name(&mut self, name: &str) -> RepoResult<Option<Role>> {
        Ok(self.effective_roles().into_values().find(|r| r.name == name))
    }

    async fn count_role_users(&mut self, role_id: EntityId) -> RepoResult<i64> {
        let count = self
            .effective_users()
            .values()
            .filter(|u| u.role_ids.contains(&role_id))
            .count();
        Ok(count as i64)
    }

    async fn insert_office(&mut self, office: &Office) -> RepoResult<()> {
        let offices = self.effective_offices();
        if offices.values().any(|o| o.code == office.code) {
            return Err(DomainError::OfficeCodeExists(office.code.clone()));
        }
        self.writes.push(Write::InsertOffice(office.clone()));
        Ok(())
    }

    async fn update_office(&mut self, office: &Office) -> RepoResult<()> {
        let offices = self.effective_offices();
        if !offices.contains_key(&office.id.into_inner()) {
            return Err(DomainError::OfficeNotFound(office.id));
        }
        if offices
            .values()
            .any(|o| o.id != office.id && o.code == office.code)
        {
            return Err(DomainError::OfficeCodeExists(office.code.clone()));
        }
        self.writes.push(Write::UpdateOffice(office.clone()));
        Ok(())
    }

    async fn delete_office(&mut self, id: EntityId) -> RepoResult<()> {
        if !self.effective_offices().contains_key(&id.into_inner()) {
            return Err(DomainError::OfficeNotFound(id));
        }
        self.writes.push(Write::DeleteOffice(id));
        Ok(())
    }

    async fn insert_user(&mut self, user: &User) -> RepoResult<()> {
        let users = self.effective_users();
        if users.values().any(|u| u.username == user.username) {
            return Err(DomainError::UsernameExists(user.username.clone()));
        }
        if users.values().any(|u| u.email == user.email) {
            return Err(DomainError::EmailExists(user.email.clone()));
        }
        self.writes.push(Write::InsertUser(user.clone()));
        Ok(())
    }

    async fn update_user(&mut self, user: &User) -> RepoResult<()> {
        let users = self.effective_users();
        if !users.contains_key(&user.id.into_inner()) {
            return Err(DomainError::UserNotFound(user.id));
        }
        if users
            .values()
            .any(|u| u.id != user.id && u.username == user.username)
        {
            return Err(DomainError::UsernameExists(user.username.clone()));
        }
        if users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(DomainError::EmailExists(user.email.clone()));
        }
        self.writes.push(Write::UpdateUser(user.clone()));
        Ok(())
    }

    async fn delete_user(&mut self, id: EntityId) -> RepoResult<()> {
        if !self.effective_users().contains_key(&id.into_inner()) {
            return Err(DomainError::UserNotFound(id));
        }
        self.writes.push(Write::DeleteUser(id));
        Ok(())
    }

    async fn insert_role(&mut self, role: &Role) -> RepoResult<()> {
        let roles = self.effective_roles();
        if roles.values().any(|r| r.name == role.name) {
            return Err(DomainError::RoleNameExists(role.name.clone()));
        }
        self.writes.push(Write::InsertRole(role.clone()));
        Ok(())
    }

    async fn update_role(&mut self, role: &Role) -> RepoResult<()> {
        let roles = self.effective_roles();
        if !roles.contains_key(&role.id.into_inner()) {
            return Err(DomainError::RoleNotFound(role.id));
        }
        if roles
            .values()
            .any(|r| r.id != role.id && r.name == role.name)
        {
            return Err(DomainError::RoleNameExists(role.name.clone()));
        }
        self.writes.push(Write::UpdateRole(role.clone()));
        Ok(())
    }

    async fn delete_role(&mut self, id: EntityId) -> RepoResult<()> {
        if !self.effective_roles().contains_key(&id.into_inner()) {
            return Err(DomainError::RoleNotFound(id));
        }
        self.writes.push(Write::DeleteRole(id));
        Ok(())
    }

    async fn insert_audit(&mut self, record: &AuditRecord) -> RepoResult<()> {
        self.writes.push(Write::InsertAudit(record.clone()));
        Ok(())
    }

    async fn commit(self: Box<Self>) -> RepoResult<()> {
        let mut tables = self.tables.write();
        for write in self.writes {
            match write {
                Write::InsertOffice(o) | Write::UpdateOffice(o) => {
                    tables.offices.insert(o.id.into_inner(), o);
                }
                Write::DeleteOffice(id) => {
                    tables.offices.remove(&id.into_inner());
                }
                Write::InsertUser(u) | Write::UpdateUser(u) => {
                    tables.users.insert(u.id.into_inner(), u);
                }
                Write::DeleteUser(id) => {
                    tables.users.remove(&id.into_inner());
                }
                Write::InsertRole(r) | Write::UpdateRole(r) => {
                    tables.roles.insert(r.id.into_inner(), r);
                }
                Write::DeleteRole(id) => {
                    tables.roles.remove(&id.into_inner());
                }
                Write::InsertAudit(record) => {
                    tables.audits.push(record);
                }
            }
        }
        Ok(())
    }
}
