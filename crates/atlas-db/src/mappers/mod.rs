//! Entity to model mappers
//!
//! This module provides conversions between domain entities (atlas-core) and
//! database models.
//! - `From<Model> for Entity`: Convert database rows to domain objects
//! - [`user_with_roles`]: attach link-table role ids to a user row

mod audit;
mod office;
mod role;
mod user;

pub use user::user_with_roles;
