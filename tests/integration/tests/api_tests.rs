//! End-to-end API tests
//!
//! Each test spawns its own server over a fresh in-memory store, drives it
//! through the HTTP surface, and checks both the responses and the audit
//! trail the dispatcher leaves behind.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use anyhow::Result;
use integration_tests::{
    assert_json, assert_status, office_payload, office_payload_with_code, role_payload,
    unique_suffix, user_payload, user_payload_linked, user_payload_with_roles, AuditResponse,
    DispatchResponse, ErrorResponse, OfficeResponse, RoleResponse, TestServer, UserResponse,
};
use reqwest::StatusCode;
use serde_json::{json, Value};

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_check() -> Result<()> {
    let server = TestServer::start().await?;

    let response = server.get("/health").await?;
    let body: Value = assert_json(response, StatusCode::OK).await?;
    assert_eq!(body["status"], "healthy");
    Ok(())
}

#[tokio::test]
async fn test_readiness_check() -> Result<()> {
    let server = TestServer::start().await?;

    let response = server.get("/health/ready").await?;
    let body: Value = assert_json(response, StatusCode::OK).await?;
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["database"], "healthy");
    Ok(())
}

// ============================================================================
// Offices
// ============================================================================

#[tokio::test]
async fn test_create_office_returns_id_and_empty_changes() -> Result<()> {
    let server = TestServer::start().await?;

    let payload = office_payload();
    let response = server.post("/api/v1/offices", &payload).await?;
    let created: DispatchResponse = assert_json(response, StatusCode::CREATED).await?;

    assert!(created.id > 0);
    assert_eq!(created.changes, json!({}));

    let response = server.get(&format!("/api/v1/offices/{}", created.id)).await?;
    let office: OfficeResponse = assert_json(response, StatusCode::OK).await?;
    assert_eq!(office.id, created.id);
    assert_eq!(office.phone.as_deref(), Some("023-111-222"));
    assert_eq!(office.parent_id, None);
    Ok(())
}

#[tokio::test]
async fn test_create_office_writes_one_audit_row() -> Result<()> {
    let server = TestServer::start().await?;

    let payload = office_payload();
    let response = server.post_as("/api/v1/offices", "admin", &payload).await?;
    let created: DispatchResponse = assert_json(response, StatusCode::CREATED).await?;

    let response = server.get("/api/v1/audits").await?;
    let audits: Vec<AuditResponse> = assert_json(response, StatusCode::OK).await?;

    assert_eq!(audits.len(), 1);
    assert_eq!(audits[0].entity_id, created.id);
    assert_eq!(audits[0].action, "CREATE");
    assert_eq!(audits[0].entity, "OFFICE");
    assert_eq!(audits[0].href, "/api/v1/offices");
    assert_eq!(audits[0].json, payload);
    assert_eq!(audits[0].created_by, "admin");
    Ok(())
}

#[tokio::test]
async fn test_missing_actor_recorded_as_system() -> Result<()> {
    let server = TestServer::start().await?;

    let response = server.post("/api/v1/offices", &office_payload()).await?;
    assert_status(response, StatusCode::CREATED).await?;

    let response = server.get("/api/v1/audits").await?;
    let audits: Vec<AuditResponse> = assert_json(response, StatusCode::OK).await?;
    assert_eq!(audits[0].created_by, "system");
    Ok(())
}

#[tokio::test]
async fn test_update_office_reports_only_changed_fields() -> Result<()> {
    let server = TestServer::start().await?;

    let response = server.post("/api/v1/offices", &office_payload()).await?;
    let created: DispatchResponse = assert_json(response, StatusCode::CREATED).await?;

    // phone matches the stored value, so only nameEn counts as changed
    let update = json!({"nameEn": "Renamed Office", "phone": "023-111-222"}).to_string();
    let response = server
        .put_as(&format!("/api/v1/offices/{}", created.id), "admin", &update)
        .await?;
    let updated: DispatchResponse = assert_json(response, StatusCode::OK).await?;

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.changes, json!({"nameEn": "Renamed Office"}));

    let response = server.get(&format!("/api/v1/offices/{}", created.id)).await?;
    let office: OfficeResponse = assert_json(response, StatusCode::OK).await?;
    assert_eq!(office.name_en, "Renamed Office");
    Ok(())
}

#[tokio::test]
async fn test_noop_update_is_still_audited() -> Result<()> {
    let server = TestServer::start().await?;

    let response = server.post("/api/v1/offices", &office_payload()).await?;
    let created: DispatchResponse = assert_json(response, StatusCode::CREATED).await?;

    let response = server.get(&format!("/api/v1/offices/{}", created.id)).await?;
    let office: OfficeResponse = assert_json(response, StatusCode::OK).await?;

    let same = json!({"nameEn": office.name_en}).to_string();
    let response = server
        .put(&format!("/api/v1/offices/{}", created.id), &same)
        .await?;
    let updated: DispatchResponse = assert_json(response, StatusCode::OK).await?;
    assert_eq!(updated.changes, json!({}));

    // The accepted command is recorded even though nothing changed
    let response = server.get("/api/v1/audits").await?;
    let audits: Vec<AuditResponse> = assert_json(response, StatusCode::OK).await?;
    assert_eq!(audits.len(), 2);
    assert_eq!(audits[0].action, "UPDATE");
    Ok(())
}

#[tokio::test]
async fn test_null_clears_optional_field() -> Result<()> {
    let server = TestServer::start().await?;

    let response = server.post("/api/v1/offices", &office_payload()).await?;
    let created: DispatchResponse = assert_json(response, StatusCode::CREATED).await?;

    let response = server
        .put(
            &format!("/api/v1/offices/{}", created.id),
            &json!({"phone": null}).to_string(),
        )
        .await?;
    let updated: DispatchResponse = assert_json(response, StatusCode::OK).await?;
    assert_eq!(updated.changes, json!({"phone": null}));

    let response = server.get(&format!("/api/v1/offices/{}", created.id)).await?;
    let office: OfficeResponse = assert_json(response, StatusCode::OK).await?;
    assert_eq!(office.phone, None);
    Ok(())
}

#[tokio::test]
async fn test_unknown_fields_all_listed_in_one_response() -> Result<()> {
    let server = TestServer::start().await?;

    let payload = json!({
        "code": "OF9999",
        "nameEn": "Office",
        "bogus": 1,
        "extra": "x"
    })
    .to_string();
    let response = server.post("/api/v1/offices", &payload).await?;
    let error: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await?;

    assert_eq!(error.error.code, "UNSUPPORTED_PARAMETER");
    let details = error.error.details.expect("details should carry the field list");
    assert_eq!(details["fields"], json!(["bogus", "extra"]));

    // Rejected commands leave no trace
    let response = server.get("/api/v1/audits").await?;
    let audits: Vec<AuditResponse> = assert_json(response, StatusCode::OK).await?;
    assert!(audits.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_malformed_payload_rejected_without_side_effects() -> Result<()> {
    let server = TestServer::start().await?;

    let response = server.post("/api/v1/offices", "{not json").await?;
    let error: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await?;
    assert_eq!(error.error.code, "MALFORMED_PAYLOAD");

    let response = server.get("/api/v1/offices").await?;
    let offices: Vec<OfficeResponse> = assert_json(response, StatusCode::OK).await?;
    assert!(offices.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_get_missing_office_returns_404() -> Result<()> {
    let server = TestServer::start().await?;

    let response = server.get("/api/v1/offices/999999").await?;
    let error: ErrorResponse = assert_json(response, StatusCode::NOT_FOUND).await?;
    assert_eq!(error.error.code, "UNKNOWN_OFFICE");
    Ok(())
}

#[tokio::test]
async fn test_invalid_path_parameter_returns_400() -> Result<()> {
    let server = TestServer::start().await?;

    let response = server.get("/api/v1/offices/abc").await?;
    let error: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await?;
    assert_eq!(error.error.code, "INVALID_PATH_PARAMETER");
    Ok(())
}

#[tokio::test]
async fn test_duplicate_office_code_conflict() -> Result<()> {
    let server = TestServer::start().await?;

    let response = server
        .post("/api/v1/offices", &office_payload_with_code("HQ01"))
        .await?;
    assert_status(response, StatusCode::CREATED).await?;

    let response = server
        .post("/api/v1/offices", &office_payload_with_code("HQ01"))
        .await?;
    let error: ErrorResponse = assert_json(response, StatusCode::CONFLICT).await?;
    assert_eq!(error.error.code, "OFFICE_CODE_EXISTS");

    // Only the successful create was audited
    let response = server.get("/api/v1/audits").await?;
    let audits: Vec<AuditResponse> = assert_json(response, StatusCode::OK).await?;
    assert_eq!(audits.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_delete_office() -> Result<()> {
    let server = TestServer::start().await?;

    let response = server.post("/api/v1/offices", &office_payload()).await?;
    let created: DispatchResponse = assert_json(response, StatusCode::CREATED).await?;

    let response = server
        .delete_as(&format!("/api/v1/offices/{}", created.id), "admin")
        .await?;
    let deleted: DispatchResponse = assert_json(response, StatusCode::OK).await?;
    assert_eq!(deleted.id, created.id);
    assert_eq!(deleted.changes, json!({}));

    let response = server.get(&format!("/api/v1/offices/{}", created.id)).await?;
    assert_status(response, StatusCode::NOT_FOUND).await?;

    // The delete's audit row carries an empty object payload
    let response = server.get("/api/v1/audits").await?;
    let audits: Vec<AuditResponse> = assert_json(response, StatusCode::OK).await?;
    assert_eq!(audits[0].action, "DELETE");
    assert_eq!(audits[0].json, "{}");
    Ok(())
}

#[tokio::test]
async fn test_delete_office_with_children_refused() -> Result<()> {
    let server = TestServer::start().await?;

    let response = server.post("/api/v1/offices", &office_payload()).await?;
    let parent: DispatchResponse = assert_json(response, StatusCode::CREATED).await?;

    let suffix = unique_suffix();
    let child = json!({
        "code": format!("BR{suffix:04}"),
        "nameEn": "Branch",
        "parentId": parent.id
    })
    .to_string();
    let response = server.post("/api/v1/offices", &child).await?;
    assert_status(response, StatusCode::CREATED).await?;

    let response = server.delete(&format!("/api/v1/offices/{}", parent.id)).await?;
    let error: ErrorResponse = assert_json(response, StatusCode::CONFLICT).await?;
    assert_eq!(error.error.code, "OFFICE_HAS_CHILDREN");
    Ok(())
}

#[tokio::test]
async fn test_list_offices_by_parent() -> Result<()> {
    let server = TestServer::start().await?;

    let response = server.post("/api/v1/offices", &office_payload()).await?;
    let parent: DispatchResponse = assert_json(response, StatusCode::CREATED).await?;

    let suffix = unique_suffix();
    let child = json!({
        "code": format!("BR{suffix:04}"),
        "nameEn": "Branch",
        "parentId": parent.id
    })
    .to_string();
    let response = server.post("/api/v1/offices", &child).await?;
    let child: DispatchResponse = assert_json(response, StatusCode::CREATED).await?;

    let response = server
        .get(&format!("/api/v1/offices?parentId={}", parent.id))
        .await?;
    let offices: Vec<OfficeResponse> = assert_json(response, StatusCode::OK).await?;
    assert_eq!(offices.len(), 1);
    assert_eq!(offices[0].id, child.id);
    assert_eq!(offices[0].parent_id, Some(parent.id));
    Ok(())
}

// ============================================================================
// Users
// ============================================================================

#[tokio::test]
async fn test_user_lifecycle_with_links() -> Result<()> {
    let server = TestServer::start().await?;

    let response = server.post("/api/v1/offices", &office_payload()).await?;
    let office: DispatchResponse = assert_json(response, StatusCode::CREATED).await?;

    let response = server.post("/api/v1/roles", &role_payload()).await?;
    let role: DispatchResponse = assert_json(response, StatusCode::CREATED).await?;

    let payload = user_payload_linked(office.id, &[role.id]);
    let response = server.post_as("/api/v1/users", "admin", &payload).await?;
    let created: DispatchResponse = assert_json(response, StatusCode::CREATED).await?;
    assert_eq!(created.changes, json!({}));

    let response = server.get(&format!("/api/v1/users/{}", created.id)).await?;
    let user: UserResponse = assert_json(response, StatusCode::OK).await?;
    assert!(user.enabled);
    assert_eq!(user.office_id, Some(office.id));
    assert_eq!(user.role_ids, vec![role.id]);

    // Disable, then unlink the office with an explicit null
    let response = server
        .put(
            &format!("/api/v1/users/{}", created.id),
            &json!({"enabled": false}).to_string(),
        )
        .await?;
    let updated: DispatchResponse = assert_json(response, StatusCode::OK).await?;
    assert_eq!(updated.changes, json!({"enabled": false}));

    let response = server
        .put(
            &format!("/api/v1/users/{}", created.id),
            &json!({"officeId": null}).to_string(),
        )
        .await?;
    let updated: DispatchResponse = assert_json(response, StatusCode::OK).await?;
    assert_eq!(updated.changes, json!({"officeId": null}));

    let response = server.get(&format!("/api/v1/users/{}", created.id)).await?;
    let user: UserResponse = assert_json(response, StatusCode::OK).await?;
    assert!(!user.enabled);
    assert_eq!(user.office_id, None);
    Ok(())
}

#[tokio::test]
async fn test_resubmitting_reordered_roles_is_a_noop() -> Result<()> {
    let server = TestServer::start().await?;

    let response = server.post("/api/v1/roles", &role_payload()).await?;
    let role_a: DispatchResponse = assert_json(response, StatusCode::CREATED).await?;
    let response = server.post("/api/v1/roles", &role_payload()).await?;
    let role_b: DispatchResponse = assert_json(response, StatusCode::CREATED).await?;

    let payload = user_payload_with_roles(&[role_a.id, role_b.id]);
    let response = server.post("/api/v1/users", &payload).await?;
    let created: DispatchResponse = assert_json(response, StatusCode::CREATED).await?;

    // same membership in the opposite order: converges to a no-op
    let response = server
        .put(
            &format!("/api/v1/users/{}", created.id),
            &json!({"roleIds": [role_b.id, role_a.id]}).to_string(),
        )
        .await?;
    let updated: DispatchResponse = assert_json(response, StatusCode::OK).await?;
    assert_eq!(updated.changes, json!({}));

    let response = server.get(&format!("/api/v1/users/{}", created.id)).await?;
    let user: UserResponse = assert_json(response, StatusCode::OK).await?;
    let mut expected = vec![role_a.id, role_b.id];
    expected.sort_unstable();
    assert_eq!(user.role_ids, expected);
    Ok(())
}

#[tokio::test]
async fn test_create_user_with_unknown_office_fails() -> Result<()> {
    let server = TestServer::start().await?;

    let response = server
        .post("/api/v1/users", &user_payload_linked(999_999, &[]))
        .await?;
    let error: ErrorResponse = assert_json(response, StatusCode::NOT_FOUND).await?;
    assert_eq!(error.error.code, "UNKNOWN_OFFICE");
    Ok(())
}

#[tokio::test]
async fn test_user_email_conflict() -> Result<()> {
    let server = TestServer::start().await?;

    let response = server.post("/api/v1/users", &user_payload()).await?;
    let first: DispatchResponse = assert_json(response, StatusCode::CREATED).await?;
    let response = server.get(&format!("/api/v1/users/{}", first.id)).await?;
    let first_user: UserResponse = assert_json(response, StatusCode::OK).await?;

    let response = server.post("/api/v1/users", &user_payload()).await?;
    let second: DispatchResponse = assert_json(response, StatusCode::CREATED).await?;

    let response = server
        .put(
            &format!("/api/v1/users/{}", second.id),
            &json!({"email": first_user.email}).to_string(),
        )
        .await?;
    let error: ErrorResponse = assert_json(response, StatusCode::CONFLICT).await?;
    assert_eq!(error.error.code, "EMAIL_EXISTS");
    Ok(())
}

#[tokio::test]
async fn test_user_validation_rejects_bad_email() -> Result<()> {
    let server = TestServer::start().await?;

    let payload = json!({"username": "sokha", "email": "not-an-email"}).to_string();
    let response = server.post("/api/v1/users", &payload).await?;
    let error: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await?;
    assert_eq!(error.error.code, "VALIDATION_FAILED");
    Ok(())
}

// ============================================================================
// Roles
// ============================================================================

#[tokio::test]
async fn test_role_crud() -> Result<()> {
    let server = TestServer::start().await?;

    let response = server.post("/api/v1/roles", &role_payload()).await?;
    let created: DispatchResponse = assert_json(response, StatusCode::CREATED).await?;

    let response = server.get(&format!("/api/v1/roles/{}", created.id)).await?;
    let role: RoleResponse = assert_json(response, StatusCode::OK).await?;
    assert!(role.permissions.contains(&"CREATE_OFFICE".to_string()));

    let response = server
        .put(
            &format!("/api/v1/roles/{}", created.id),
            &json!({"permissions": ["DELETE_OFFICE"]}).to_string(),
        )
        .await?;
    let updated: DispatchResponse = assert_json(response, StatusCode::OK).await?;
    assert_eq!(updated.changes, json!({"permissions": ["DELETE_OFFICE"]}));

    let response = server.delete(&format!("/api/v1/roles/{}", created.id)).await?;
    assert_status(response, StatusCode::OK).await?;

    let response = server.get(&format!("/api/v1/roles/{}", created.id)).await?;
    assert_status(response, StatusCode::NOT_FOUND).await?;
    Ok(())
}

#[tokio::test]
async fn test_delete_assigned_role_refused() -> Result<()> {
    let server = TestServer::start().await?;

    let response = server.post("/api/v1/roles", &role_payload()).await?;
    let role: DispatchResponse = assert_json(response, StatusCode::CREATED).await?;

    let response = server
        .post("/api/v1/users", &user_payload_with_roles(&[role.id]))
        .await?;
    assert_status(response, StatusCode::CREATED).await?;

    let response = server.delete(&format!("/api/v1/roles/{}", role.id)).await?;
    let error: ErrorResponse = assert_json(response, StatusCode::CONFLICT).await?;
    assert_eq!(error.error.code, "ROLE_IN_USE");
    Ok(())
}

// ============================================================================
// Audit trail
// ============================================================================

#[tokio::test]
async fn test_audits_newest_first_and_filterable() -> Result<()> {
    let server = TestServer::start().await?;

    let response = server.post("/api/v1/offices", &office_payload()).await?;
    let office: DispatchResponse = assert_json(response, StatusCode::CREATED).await?;

    let response = server.post("/api/v1/roles", &role_payload()).await?;
    let role: DispatchResponse = assert_json(response, StatusCode::CREATED).await?;

    let response = server.get("/api/v1/audits").await?;
    let audits: Vec<AuditResponse> = assert_json(response, StatusCode::OK).await?;
    assert_eq!(audits.len(), 2);
    assert_eq!(audits[0].entity, "ROLE");
    assert_eq!(audits[1].entity, "OFFICE");

    let response = server.get("/api/v1/audits?entity=ROLE").await?;
    let audits: Vec<AuditResponse> = assert_json(response, StatusCode::OK).await?;
    assert_eq!(audits.len(), 1);
    assert_eq!(audits[0].entity_id, role.id);

    let response = server
        .get(&format!("/api/v1/audits?entityId={}", office.id))
        .await?;
    let audits: Vec<AuditResponse> = assert_json(response, StatusCode::OK).await?;
    assert_eq!(audits.len(), 1);
    assert_eq!(audits[0].entity, "OFFICE");
    Ok(())
}

#[tokio::test]
async fn test_audit_unknown_entity_filter_rejected() -> Result<()> {
    let server = TestServer::start().await?;

    let response = server.get("/api/v1/audits?entity=WIDGET").await?;
    let error: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await?;
    assert_eq!(error.error.code, "INVALID_QUERY_PARAMETER");
    Ok(())
}
