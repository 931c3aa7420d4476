//! Domain traits - change-tracking protocol and storage ports

mod apply_changes;
mod store;

pub use apply_changes::ApplyChanges;
pub use store::{AuditFilter, OfficeFilter, RepoResult, Store, StoreTx, UserFilter};
