//! Test fixtures and data generators
//!
//! Payload builders produce the raw JSON text the API expects; response
//! structs mirror the wire format for deserialization.

use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Office create payload with a unique code
pub fn office_payload() -> String {
    let suffix = unique_suffix();
    json!({
        "code": format!("OF{suffix:04}"),
        "nameEn": format!("Office {suffix}"),
        "phone": "023-111-222"
    })
    .to_string()
}

/// Office create payload with an explicit code
pub fn office_payload_with_code(code: &str) -> String {
    json!({
        "code": code,
        "nameEn": format!("Office {code}")
    })
    .to_string()
}

/// User create payload with unique username and email
pub fn user_payload() -> String {
    let suffix = unique_suffix();
    json!({
        "username": format!("user{suffix}"),
        "email": format!("user{suffix}@example.com"),
        "displayName": format!("User {suffix}")
    })
    .to_string()
}

/// User create payload linked to an office and roles
pub fn user_payload_linked(office_id: i64, role_ids: &[i64]) -> String {
    let suffix = unique_suffix();
    json!({
        "username": format!("user{suffix}"),
        "email": format!("user{suffix}@example.com"),
        "officeId": office_id,
        "roleIds": role_ids
    })
    .to_string()
}

/// User create payload holding roles but no office
pub fn user_payload_with_roles(role_ids: &[i64]) -> String {
    let suffix = unique_suffix();
    json!({
        "username": format!("user{suffix}"),
        "email": format!("user{suffix}@example.com"),
        "roleIds": role_ids
    })
    .to_string()
}

/// Role create payload with a unique name
pub fn role_payload() -> String {
    let suffix = unique_suffix();
    json!({
        "name": format!("role-{suffix}"),
        "permissions": ["CREATE_OFFICE", "UPDATE_OFFICE"]
    })
    .to_string()
}

/// Dispatch response: affected id plus changed fields
#[derive(Debug, Deserialize)]
pub struct DispatchResponse {
    pub id: i64,
    pub changes: Value,
}

/// Office response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficeResponse {
    pub id: i64,
    pub code: String,
    pub name_en: String,
    pub name_kh: Option<String>,
    pub phone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub parent_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

/// User response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    pub enabled: bool,
    pub office_id: Option<i64>,
    pub role_ids: Vec<i64>,
}

/// Role response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub permissions: Vec<String>,
}

/// Audit row response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResponse {
    pub entity_id: i64,
    pub action: String,
    pub entity: String,
    pub href: String,
    pub json: String,
    pub created_by: String,
    pub created_at: String,
}

/// Error response
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    pub details: Option<Value>,
}
