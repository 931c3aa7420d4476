//! Value objects - immutable types that represent domain concepts

mod change_set;
mod entity_id;

pub use change_set::ChangeSet;
pub use entity_id::{EntityId, EntityIdGenerator, EntityIdParseError};
