//! Audit record <-> model mapper

use atlas_core::entities::AuditRecord;
use atlas_core::value_objects::EntityId;

use crate::models::AuditLogModel;

/// Convert AuditLogModel to AuditRecord
///
/// The database sequence id is dropped; the trail is append-only and rows
/// are never addressed individually.
impl From<AuditLogModel> for AuditRecord {
    fn from(model: AuditLogModel) -> Self {
        AuditRecord {
            entity_id: EntityId::new(model.entity_id),
            action: model.action,
            entity: model.entity,
            href: model.href,
            json: model.json,
            created_by: model.created_by,
            created_at: model.created_at,
        }
    }
}
