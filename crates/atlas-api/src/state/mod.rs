//! Application state
//!
//! Holds the shared state for the Axum application: the service context,
//! the command dispatcher, and configuration.

use std::sync::Arc;

use atlas_common::AppConfig;
use atlas_service::{CommandDispatcher, ServiceContext};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Service context containing shared dependencies
    context: Arc<ServiceContext>,
    /// The single funnel for every mutating request
    dispatcher: Arc<CommandDispatcher>,
    /// Application configuration
    config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(context: ServiceContext, dispatcher: CommandDispatcher, config: AppConfig) -> Self {
        Self {
            context: Arc::new(context),
            dispatcher: Arc::new(dispatcher),
            config: Arc::new(config),
        }
    }

    /// Get the service context
    pub fn context(&self) -> &ServiceContext {
        &self.context
    }

    /// Get the command dispatcher
    pub fn dispatcher(&self) -> &CommandDispatcher {
        &self.dispatcher
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("context", &"ServiceContext")
            .field("dispatcher", &"CommandDispatcher")
            .field("config", &"AppConfig")
            .finish()
    }
}
