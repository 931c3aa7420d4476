//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use atlas_common::{AppConfig, AppError};
use atlas_core::{EntityIdGenerator, Store};
use atlas_db::{create_pool, PgStore};
use atlas_service::{build_registry, CommandDispatcher, ServiceContext};
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::apply_middleware;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let router = create_router().merge(health_routes());
    let router = apply_middleware(
        router,
        &state.config().cors,
        state.config().app.env.is_production(),
    );
    router.with_state(state)
}

/// Initialize all dependencies and create AppState backed by PostgreSQL
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let db_config = atlas_db::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        min_connections: config.database.min_connections,
        ..Default::default()
    };
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    let store: Arc<dyn Store> = Arc::new(PgStore::new(pool));
    create_app_state_with_store(store, config)
}

/// Create AppState over any store implementation
///
/// A duplicate handler registration aborts startup here, before the
/// process serves traffic.
pub fn create_app_state_with_store(
    store: Arc<dyn Store>,
    config: AppConfig,
) -> Result<AppState, AppError> {
    let ids = Arc::new(EntityIdGenerator::new(config.id_gen.node_id));

    let registry = build_registry(Arc::clone(&ids))?;
    info!(handlers = registry.len(), "Handler registry built");

    let dispatcher = CommandDispatcher::new(Arc::new(registry), Arc::clone(&store));
    let context = ServiceContext::new(store, ids);

    Ok(AppState::new(context, dispatcher, config))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {}: {}", addr, e)))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {}", e)))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .server
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid server address: {e}")))?;

    let state = create_app_state(config).await?;
    let app = create_app(state);

    run_server(app, addr).await
}
