//! User handlers
//!
//! Endpoints for administrative accounts.

use axum::{
    extract::{OriginalUri, Path, Query, State},
    Json,
};
use serde::Deserialize;

use atlas_core::{Command, EntityKind, UserFilter};
use atlas_service::{DispatchResponse, QueryService, UserResponse};

use crate::extractors::Actor;
use crate::response::{ApiResult, Created};
use crate::state::AppState;

use super::parse_id;

/// Query parameters for user listings
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersQuery {
    pub office_id: Option<i64>,
    pub limit: Option<i64>,
}

/// List users, optionally scoped to one office
///
/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let filter = UserFilter {
        office_id: query.office_id.map(Into::into),
        limit: query.limit,
    };

    let service = QueryService::new(state.context());
    let users = service.list_users(filter).await?;
    Ok(Json(users))
}

/// Get user by ID
///
/// GET /users/{user_id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    let user_id = parse_id(&user_id, "user_id")?;

    let service = QueryService::new(state.context());
    let user = service.get_user(user_id).await?;
    Ok(Json(user))
}

/// Create user
///
/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    actor: Actor,
    OriginalUri(uri): OriginalUri,
    body: String,
) -> ApiResult<Created<Json<DispatchResponse>>> {
    let command = Command::create(EntityKind::User, uri.path(), body);
    let outcome = state.dispatcher().dispatch(command, actor.as_deref()).await?;
    Ok(Created(Json(outcome.into())))
}

/// Update user
///
/// PUT /users/{user_id}
pub async fn update_user(
    State(state): State<AppState>,
    actor: Actor,
    Path(user_id): Path<String>,
    OriginalUri(uri): OriginalUri,
    body: String,
) -> ApiResult<Json<DispatchResponse>> {
    let user_id = parse_id(&user_id, "user_id")?;

    let command = Command::update(user_id, EntityKind::User, uri.path(), body);
    let outcome = state.dispatcher().dispatch(command, actor.as_deref()).await?;
    Ok(Json(outcome.into()))
}

/// Delete user
///
/// DELETE /users/{user_id}
pub async fn delete_user(
    State(state): State<AppState>,
    actor: Actor,
    Path(user_id): Path<String>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Json<DispatchResponse>> {
    let user_id = parse_id(&user_id, "user_id")?;

    let command = Command::delete(user_id, EntityKind::User, uri.path());
    let outcome = state.dispatcher().dispatch(command, actor.as_deref()).await?;
    Ok(Json(outcome.into()))
}
