//! Command vocabulary - immutable mutation descriptions routed by the dispatcher

mod action;
mod command;

pub use action::{Action, EntityKind, ParseActionError, ParseEntityKindError};
pub use command::{Command, ParsedCommand};
