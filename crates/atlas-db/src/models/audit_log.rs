//! Audit log database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for audit_logs table
///
/// The `id` is a database-side sequence used only for stable ordering; the
/// domain record does not carry it.
#[derive(Debug, Clone, FromRow)]
pub struct AuditLogModel {
    pub id: i64,
    pub entity_id: i64,
    pub action: String,
    pub entity: String,
    pub href: String,
    /// Raw request payload, stored verbatim as TEXT
    pub json: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}
