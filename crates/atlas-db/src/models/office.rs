//! Office database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for offices table
#[derive(Debug, Clone, FromRow)]
pub struct OfficeModel {
    pub id: i64,
    pub code: String,
    pub name_en: String,
    pub name_kh: Option<String>,
    pub phone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub parent_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OfficeModel {
    /// Check if this office sits at the top of the hierarchy
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
