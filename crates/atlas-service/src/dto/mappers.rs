//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use atlas_core::entities::{AuditRecord, Office, Role, User};

use super::responses::{AuditResponse, OfficeResponse, RoleResponse, UserResponse};

impl From<&Office> for OfficeResponse {
    fn from(office: &Office) -> Self {
        Self {
            id: office.id,
            code: office.code.clone(),
            name_en: office.name_en.clone(),
            name_kh: office.name_kh.clone(),
            phone: office.phone.clone(),
            latitude: office.latitude,
            longitude: office.longitude,
            parent_id: office.parent_id,
            created_at: office.created_at,
            updated_at: office.updated_at,
        }
    }
}

impl From<Office> for OfficeResponse {
    fn from(office: Office) -> Self {
        Self::from(&office)
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            enabled: user.enabled,
            office_id: user.office_id,
            role_ids: user.role_ids.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

impl From<&Role> for RoleResponse {
    fn from(role: &Role) -> Self {
        Self {
            id: role.id,
            name: role.name.clone(),
            description: role.description.clone(),
            permissions: role.permissions.clone(),
            created_at: role.created_at,
            updated_at: role.updated_at,
        }
    }
}

impl From<Role> for RoleResponse {
    fn from(role: Role) -> Self {
        Self::from(&role)
    }
}

impl From<&AuditRecord> for AuditResponse {
    fn from(record: &AuditRecord) -> Self {
        Self {
            entity_id: record.entity_id,
            action: record.action.clone(),
            entity: record.entity.clone(),
            href: record.href.clone(),
            json: record.json.clone(),
            created_by: record.created_by.clone(),
            created_at: record.created_at,
        }
    }
}

impl From<AuditRecord> for AuditResponse {
    fn from(record: AuditRecord) -> Self {
        Self::from(&record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_core::command::{Action, EntityKind};
    use atlas_core::value_objects::EntityId;

    #[test]
    fn test_office_mapper_carries_hierarchy() {
        let mut office = Office::new(EntityId::new(2), "BR01".to_string(), "Branch".to_string());
        office.parent_id = Some(EntityId::new(1));

        let response = OfficeResponse::from(&office);
        assert_eq!(response.id, EntityId::new(2));
        assert_eq!(response.parent_id, Some(EntityId::new(1)));
    }

    #[test]
    fn test_audit_mapper_keeps_raw_payload() {
        let record = AuditRecord::new(
            EntityId::new(1),
            Action::Update,
            EntityKind::User,
            "/api/v1/users/1",
            r#"{"enabled":false}"#,
            "admin",
        );

        let response = AuditResponse::from(&record);
        assert_eq!(response.action, "UPDATE");
        assert_eq!(response.json, r#"{"enabled":false}"#);
        assert_eq!(response.created_by, "admin");
    }
}
