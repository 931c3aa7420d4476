//! Application services
//!
//! The service context carries shared dependencies; the query service is
//! the read side, outside the dispatch funnel.

mod context;
mod query;

pub use context::ServiceContext;
pub use query::QueryService;
