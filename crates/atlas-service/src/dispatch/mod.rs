//! Command dispatch core - handler contract, registry, and dispatcher

mod dispatcher;
mod handler;
mod registry;

pub use dispatcher::{CommandDispatcher, DispatchOutcome};
pub use handler::{CommandHandler, HandlerOutcome};
pub use registry::HandlerRegistry;
