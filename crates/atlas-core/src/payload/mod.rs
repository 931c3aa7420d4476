//! Payload parsing and typed field access

mod accessor;

pub use accessor::{FieldState, Payload};
