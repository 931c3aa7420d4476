//! # atlas-api
//!
//! REST API server built with Axum. The transport layer builds a
//! [`atlas_core::Command`] from each mutating request and hands it to the
//! dispatcher; read endpoints go straight to the query service.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, create_app_state_with_store, run, run_server};
pub use state::AppState;
