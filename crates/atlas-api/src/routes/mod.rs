//! Route definitions
//!
//! All API routes organized by entity and mounted under /api/v1.

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{audits, health, offices, roles, users};
use crate::state::AppState;

/// Create the main API router with all routes
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(office_routes())
        .merge(user_routes())
        .merge(role_routes())
        .merge(audit_routes())
}

/// Office routes
fn office_routes() -> Router<AppState> {
    Router::new()
        .route("/offices", get(offices::list_offices))
        .route("/offices", post(offices::create_office))
        .route("/offices/:office_id", get(offices::get_office))
        .route("/offices/:office_id", put(offices::update_office))
        .route("/offices/:office_id", delete(offices::delete_office))
}

/// User routes
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list_users))
        .route("/users", post(users::create_user))
        .route("/users/:user_id", get(users::get_user))
        .route("/users/:user_id", put(users::update_user))
        .route("/users/:user_id", delete(users::delete_user))
}

/// Role routes
fn role_routes() -> Router<AppState> {
    Router::new()
        .route("/roles", get(roles::list_roles))
        .route("/roles", post(roles::create_role))
        .route("/roles/:role_id", get(roles::get_role))
        .route("/roles/:role_id", put(roles::update_role))
        .route("/roles/:role_id", delete(roles::delete_role))
}

/// Audit trail routes (read-only)
fn audit_routes() -> Router<AppState> {
    Router::new().route("/audits", get(audits::list_audits))
}
