//! Role entity - a named bundle of permission keys

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::error::DomainError;
use crate::payload::Payload;
use crate::traits::ApplyChanges;
use crate::value_objects::{ChangeSet, EntityId};

/// Role entity; permissions are `ACTION_ENTITY` keys in a stable order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub permissions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Role {
    /// Payload fields accepted by role create/update commands
    pub const PAYLOAD_FIELDS: &'static [&'static str] = &["name", "description", "permissions"];

    /// Create a new Role with required fields
    pub fn new(id: EntityId, name: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            description: None,
            permissions: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether the role grants a permission key
    pub fn grants(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

impl ApplyChanges for Role {
    fn apply_changes(&mut self, payload: &Payload) -> Result<ChangeSet, DomainError> {
        let mut changes = ChangeSet::new();

        if payload.is_changed_str("name", Some(&self.name))? {
            let name = payload.get_str("name")?.unwrap_or_default();
            changes.insert("name", json!(name));
            self.name = name;
        }

        if payload.is_changed_str("description", self.description.as_deref())? {
            let description = payload.get_str("description")?;
            changes.insert("description", json!(description));
            self.description = description;
        }

        if payload.is_changed_str_array("permissions", &self.permissions)? {
            let permissions = payload.get_str_array("permissions")?;
            changes.insert("permissions", json!(permissions));
            self.permissions = permissions;
        }

        if !changes.is_empty() {
            self.updated_at = Utc::now();
        }
        Ok(changes)
    }
}
