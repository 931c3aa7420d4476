//! Audit record - immutable history of every accepted command

use chrono::{DateTime, Utc};

use crate::command::{Action, EntityKind};
use crate::value_objects::EntityId;

/// One append-only audit row
///
/// Written exactly once per successful dispatch, in the same transaction as
/// the business mutation. Never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    pub entity_id: EntityId,
    pub action: String,
    pub entity: String,
    pub href: String,
    pub json: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl AuditRecord {
    /// Build an audit row for a completed command
    ///
    /// `json` carries the raw payload text unmodified.
    pub fn new(
        entity_id: EntityId,
        action: Action,
        entity: EntityKind,
        href: impl Into<String>,
        json: impl Into<String>,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            entity_id,
            action: action.as_str().to_string(),
            entity: entity.as_str().to_string(),
            href: href.into(),
            json: json.into(),
            created_by: created_by.into(),
            created_at: Utc::now(),
        }
    }
}
