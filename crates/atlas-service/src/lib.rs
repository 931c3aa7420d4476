//! # atlas-service
//!
//! Application layer: the command dispatch and audit core, the registered
//! command handlers for each business entity, the read-side query service,
//! and the response DTOs.
//!
//! Every mutating request funnels through [`CommandDispatcher::dispatch`]:
//! resolve the handler, parse the payload, run the handler and the audit
//! write inside one store transaction, commit, and return the affected id
//! plus the set of changed fields.

pub mod dispatch;
pub mod dto;
pub mod handlers;
pub mod services;

// Re-export commonly used types at crate root
pub use dispatch::{CommandDispatcher, CommandHandler, DispatchOutcome, HandlerRegistry};
pub use dto::{
    AuditResponse, DispatchResponse, HealthResponse, OfficeResponse, ReadinessResponse,
    RoleResponse, UserResponse,
};
pub use handlers::build_registry;
pub use services::{QueryService, ServiceContext};
