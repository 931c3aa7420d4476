//! Office handlers
//!
//! Endpoints for the office hierarchy.

use axum::{
    extract::{OriginalUri, Path, Query, State},
    Json,
};
use serde::Deserialize;

use atlas_core::{Command, EntityKind, OfficeFilter};
use atlas_service::{DispatchResponse, OfficeResponse, QueryService};

use crate::extractors::Actor;
use crate::response::{ApiResult, Created};
use crate::state::AppState;

use super::parse_id;

/// Query parameters for office listings
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOfficesQuery {
    pub parent_id: Option<i64>,
    pub limit: Option<i64>,
}

/// List offices, optionally under one parent
///
/// GET /offices
pub async fn list_offices(
    State(state): State<AppState>,
    Query(query): Query<ListOfficesQuery>,
) -> ApiResult<Json<Vec<OfficeResponse>>> {
    let filter = OfficeFilter {
        parent_id: query.parent_id.map(Into::into),
        limit: query.limit,
    };

    let service = QueryService::new(state.context());
    let offices = service.list_offices(filter).await?;
    Ok(Json(offices))
}

/// Get office by ID
///
/// GET /offices/{office_id}
pub async fn get_office(
    State(state): State<AppState>,
    Path(office_id): Path<String>,
) -> ApiResult<Json<OfficeResponse>> {
    let office_id = parse_id(&office_id, "office_id")?;

    let service = QueryService::new(state.context());
    let office = service.get_office(office_id).await?;
    Ok(Json(office))
}

/// Create office
///
/// POST /offices
pub async fn create_office(
    State(state): State<AppState>,
    actor: Actor,
    OriginalUri(uri): OriginalUri,
    body: String,
) -> ApiResult<Created<Json<DispatchResponse>>> {
    let command = Command::create(EntityKind::Office, uri.path(), body);
    let outcome = state.dispatcher().dispatch(command, actor.as_deref()).await?;
    Ok(Created(Json(outcome.into())))
}

/// Update office
///
/// PUT /offices/{office_id}
pub async fn update_office(
    State(state): State<AppState>,
    actor: Actor,
    Path(office_id): Path<String>,
    OriginalUri(uri): OriginalUri,
    body: String,
) -> ApiResult<Json<DispatchResponse>> {
    let office_id = parse_id(&office_id, "office_id")?;

    let command = Command::update(office_id, EntityKind::Office, uri.path(), body);
    let outcome = state.dispatcher().dispatch(command, actor.as_deref()).await?;
    Ok(Json(outcome.into()))
}

/// Delete office
///
/// DELETE /offices/{office_id}
pub async fn delete_office(
    State(state): State<AppState>,
    actor: Actor,
    Path(office_id): Path<String>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Json<DispatchResponse>> {
    let office_id = parse_id(&office_id, "office_id")?;

    let command = Command::delete(office_id, EntityKind::Office, uri.path());
    let outcome = state.dispatcher().dispatch(command, actor.as_deref()).await?;
    Ok(Json(outcome.into()))
}
