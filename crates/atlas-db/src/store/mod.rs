//! Store implementations
//!
//! [`PgStore`] is the production PostgreSQL store; [`MemoryStore`] backs
//! tests and local runs with the same transactional contract.

mod error;
mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{PgStore, PgStoreTx};

/// Applied when a listing filter carries no limit
pub(crate) const DEFAULT_LIST_LIMIT: i64 = 200;
/// Hard ceiling for any listing
pub(crate) const MAX_LIST_LIMIT: i64 = 1000;
