//! Role handlers
//!
//! Endpoints for role management.

use axum::{
    extract::{OriginalUri, Path, State},
    Json,
};

use atlas_core::{Command, EntityKind};
use atlas_service::{DispatchResponse, QueryService, RoleResponse};

use crate::extractors::Actor;
use crate::response::{ApiResult, Created};
use crate::state::AppState;

use super::parse_id;

/// List all roles
///
/// GET /roles
pub async fn list_roles(State(state): State<AppState>) -> ApiResult<Json<Vec<RoleResponse>>> {
    let service = QueryService::new(state.context());
    let roles = service.list_roles().await?;
    Ok(Json(roles))
}

/// Get role by ID
///
/// GET /roles/{role_id}
pub async fn get_role(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
) -> ApiResult<Json<RoleResponse>> {
    let role_id = parse_id(&role_id, "role_id")?;

    let service = QueryService::new(state.context());
    let role = service.get_role(role_id).await?;
    Ok(Json(role))
}

/// Create role
///
/// POST /roles
pub async fn create_role(
    State(state): State<AppState>,
    actor: Actor,
    OriginalUri(uri): OriginalUri,
    body: String,
) -> ApiResult<Created<Json<DispatchResponse>>> {
    let command = Command::create(EntityKind::Role, uri.path(), body);
    let outcome = state.dispatcher().dispatch(command, actor.as_deref()).await?;
    Ok(Created(Json(outcome.into())))
}

/// Update role
///
/// PUT /roles/{role_id}
pub async fn update_role(
    State(state): State<AppState>,
    actor: Actor,
    Path(role_id): Path<String>,
    OriginalUri(uri): OriginalUri,
    body: String,
) -> ApiResult<Json<DispatchResponse>> {
    let role_id = parse_id(&role_id, "role_id")?;

    let command = Command::update(role_id, EntityKind::Role, uri.path(), body);
    let outcome = state.dispatcher().dispatch(command, actor.as_deref()).await?;
    Ok(Json(outcome.into()))
}

/// Delete role
///
/// DELETE /roles/{role_id}
pub async fn delete_role(
    State(state): State<AppState>,
    actor: Actor,
    Path(role_id): Path<String>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Json<DispatchResponse>> {
    let role_id = parse_id(&role_id, "role_id")?;

    let command = Command::delete(role_id, EntityKind::Role, uri.path());
    let outcome = state.dispatcher().dispatch(command, actor.as_deref()).await?;
    Ok(Json(outcome.into()))
}
