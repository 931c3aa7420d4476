//! User entity <-> model mapper

use atlas_core::entities::User;
use atlas_core::value_objects::EntityId;

use crate::models::UserModel;

/// Convert UserModel to User entity
/// Note: role_ids need to be loaded separately or via [`user_with_roles`]
impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: EntityId::new(model.id),
            username: model.username,
            email: model.email,
            display_name: model.display_name,
            enabled: model.enabled,
            office_id: model.office_id.map(EntityId::new),
            role_ids: Vec::new(), // Loaded separately
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Convert UserModel with role IDs from the link table to a User entity
pub fn user_with_roles(model: UserModel, role_ids: Vec<i64>) -> User {
    let mut user = User::from(model);
    user.role_ids = role_ids.into_iter().map(EntityId::new).collect();
    user
}
