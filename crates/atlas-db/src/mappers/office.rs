//! Office entity <-> model mapper

use atlas_core::entities::Office;
use atlas_core::value_objects::EntityId;

use crate::models::OfficeModel;

/// Convert OfficeModel to Office entity
impl From<OfficeModel> for Office {
    fn from(model: OfficeModel) -> Self {
        Office {
            id: EntityId::new(model.id),
            code: model.code,
            name_en: model.name_en,
            name_kh: model.name_kh,
            phone: model.phone,
            latitude: model.latitude,
            longitude: model.longitude,
            parent_id: model.parent_id.map(EntityId::new),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
