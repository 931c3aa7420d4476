//! User entity - an administrative account

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::error::DomainError;
use crate::payload::Payload;
use crate::traits::ApplyChanges;
use crate::value_objects::{ChangeSet, EntityId};

/// User entity; `office_id` and `role_ids` reference other aggregates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: EntityId,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    pub enabled: bool,
    pub office_id: Option<EntityId>,
    pub role_ids: Vec<EntityId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Payload fields accepted by user create/update commands
    pub const PAYLOAD_FIELDS: &'static [&'static str] = &[
        "username",
        "email",
        "displayName",
        "enabled",
        "officeId",
        "roleIds",
    ];

    /// Create a new enabled User with required fields
    pub fn new(id: EntityId, username: String, email: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            username,
            email,
            display_name: None,
            enabled: true,
            office_id: None,
            role_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether the user holds a given role
    pub fn has_role(&self, role_id: EntityId) -> bool {
        self.role_ids.contains(&role_id)
    }
}

impl ApplyChanges for User {
    fn apply_changes(&mut self, payload: &Payload) -> Result<ChangeSet, DomainError> {
        let mut changes = ChangeSet::new();

        if payload.is_changed_str("username", Some(&self.username))? {
            let username = payload.get_str("username")?.unwrap_or_default();
            changes.insert("username", json!(username));
            self.username = username;
        }

        if payload.is_changed_str("email", Some(&self.email))? {
            let email = payload.get_str("email")?.unwrap_or_default();
            changes.insert("email", json!(email));
            self.email = email;
        }

        if payload.is_changed_str("displayName", self.display_name.as_deref())? {
            let display_name = payload.get_str("displayName")?;
            changes.insert("displayName", json!(display_name));
            self.display_name = display_name;
        }

        if payload.is_changed_bool("enabled", Some(self.enabled))? {
            // explicit null resets to the default (enabled)
            let enabled = payload.get_bool("enabled")?.unwrap_or(true);
            changes.insert("enabled", json!(enabled));
            self.enabled = enabled;
        }

        // officeId and roleIds are relationships: record the intent, the
        // caller resolves the referenced rows and performs the link
        if payload.is_changed_id("officeId", self.office_id)? {
            changes.insert("officeId", json!(payload.get_id("officeId")?));
        }

        if payload.is_changed_id_set("roleIds", &self.role_ids)? {
            changes.insert("roleIds", json!(payload.get_id_set("roleIds")?));
        }

        if !changes.is_empty() {
            self.updated_at = Utc::now();
        }
        Ok(changes)
    }
}
