//! Role entity <-> model mapper

use atlas_core::entities::Role;
use atlas_core::value_objects::EntityId;

use crate::models::RoleModel;

/// Convert RoleModel to Role entity
impl From<RoleModel> for Role {
    fn from(model: RoleModel) -> Self {
        Role {
            id: EntityId::new(model.id),
            name: model.name,
            description: model.description,
            permissions: model.permissions,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
