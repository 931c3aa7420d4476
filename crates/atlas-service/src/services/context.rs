//! Service context - dependency container shared across the service layer

use std::sync::Arc;

use atlas_core::traits::Store;
use atlas_core::value_objects::{EntityId, EntityIdGenerator};

/// Shared dependencies for services and handlers
#[derive(Clone)]
pub struct ServiceContext {
    store: Arc<dyn Store>,
    ids: Arc<EntityIdGenerator>,
}

impl ServiceContext {
    /// Create a new service context
    pub fn new(store: Arc<dyn Store>, ids: Arc<EntityIdGenerator>) -> Self {
        Self { store, ids }
    }

    /// Get the store
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Get the entity-id generator
    pub fn ids(&self) -> &Arc<EntityIdGenerator> {
        &self.ids
    }

    /// Generate a new entity id
    pub fn generate_id(&self) -> EntityId {
        self.ids.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("store", &"Store")
            .field("node_id", &self.ids.node_id())
            .finish()
    }
}
