//! Database models with SQLx `FromRow` derives

mod audit_log;
mod office;
mod role;
mod user;

pub use audit_log::AuditLogModel;
pub use office::OfficeModel;
pub use role::RoleModel;
pub use user::UserModel;
