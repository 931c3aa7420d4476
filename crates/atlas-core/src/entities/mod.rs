//! Domain entities - core business objects

mod audit;
mod office;
mod role;
mod user;

pub use audit::AuditRecord;
pub use office::Office;
pub use role::Role;
pub use user::User;
