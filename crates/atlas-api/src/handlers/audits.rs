//! Audit trail handlers
//!
//! The audit trail is append-only; the API only ever reads it.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use atlas_core::{AuditFilter, EntityKind};
use atlas_service::{AuditResponse, QueryService};

use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// Query parameters for audit listings
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAuditsQuery {
    pub entity: Option<String>,
    pub entity_id: Option<i64>,
    pub limit: Option<i64>,
}

/// List audit rows, newest first
///
/// GET /audits
pub async fn list_audits(
    State(state): State<AppState>,
    Query(query): Query<ListAuditsQuery>,
) -> ApiResult<Json<Vec<AuditResponse>>> {
    let entity = query
        .entity
        .as_deref()
        .map(|raw| {
            raw.parse::<EntityKind>()
                .map_err(|_| ApiError::invalid_query(format!("Unknown entity: {raw}")))
        })
        .transpose()?;

    let filter = AuditFilter {
        entity,
        entity_id: query.entity_id.map(Into::into),
        limit: query.limit,
    };

    let service = QueryService::new(state.context());
    let audits = service.list_audits(filter).await?;
    Ok(Json(audits))
}
