//! Office entity - an administrative unit in the geographic hierarchy

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::error::DomainError;
use crate::payload::Payload;
use crate::traits::ApplyChanges;
use crate::value_objects::{ChangeSet, EntityId};

/// Office entity; `parent_id` points at the enclosing office, if any
#[derive(Debug, Clone, PartialEq)]
pub struct Office {
    pub id: EntityId,
    pub code: String,
    pub name_en: String,
    pub name_kh: Option<String>,
    pub phone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub parent_id: Option<EntityId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Office {
    /// Payload fields accepted by office create/update commands
    pub const PAYLOAD_FIELDS: &'static [&'static str] = &[
        "code",
        "nameEn",
        "nameKh",
        "phone",
        "latitude",
        "longitude",
        "parentId",
    ];

    /// Create a new Office with required fields
    pub fn new(id: EntityId, code: String, name_en: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            code,
            name_en,
            name_kh: None,
            phone: None,
            latitude: None,
            longitude: None,
            parent_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether this office sits at the top of the hierarchy
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

impl ApplyChanges for Office {
    fn apply_changes(&mut self, payload: &Payload) -> Result<ChangeSet, DomainError> {
        let mut changes = ChangeSet::new();

        if payload.is_changed_str("code", Some(&self.code))? {
            let code = payload.get_str("code")?.unwrap_or_default();
            changes.insert("code", json!(code));
            self.code = code;
        }

        if payload.is_changed_str("nameEn", Some(&self.name_en))? {
            let name_en = payload.get_str("nameEn")?.unwrap_or_default();
            changes.insert("nameEn", json!(name_en));
            self.name_en = name_en;
        }

        if payload.is_changed_str("nameKh", self.name_kh.as_deref())? {
            let name_kh = payload.get_str("nameKh")?;
            changes.insert("nameKh", json!(name_kh));
            self.name_kh = name_kh;
        }

        if payload.is_changed_str("phone", self.phone.as_deref())? {
            let phone = payload.get_str("phone")?;
            changes.insert("phone", json!(phone));
            self.phone = phone;
        }

        if payload.is_changed_f64("latitude", self.latitude)? {
            let latitude = payload.get_f64("latitude")?;
            changes.insert("latitude", json!(latitude));
            self.latitude = latitude;
        }

        if payload.is_changed_f64("longitude", self.longitude)? {
            let longitude = payload.get_f64("longitude")?;
            changes.insert("longitude", json!(longitude));
            self.longitude = longitude;
        }

        // parentId is a relationship: record the intent, the caller looks up
        // the new parent and performs the link
        if payload.is_changed_id("parentId", self.parent_id)? {
            changes.insert("parentId", json!(payload.get_id("parentId")?));
        }

        if !changes.is_empty() {
            self.updated_at = Utc::now();
        }
        Ok(changes)
    }
}
