//! Change-tracking protocol - the contract every mutable entity implements
//!
//! Lets the dispatcher and handlers work field-by-field partial updates
//! without knowing any entity's shape.

use crate::error::DomainError;
use crate::payload::Payload;
use crate::value_objects::ChangeSet;

/// Compute and apply the partial update described by a parsed payload
pub trait ApplyChanges {
    /// For each updatable field: detect whether the payload requests a
    /// different value, assign it, and record `(field, newValue)` in the
    /// returned set. Relationship fields (foreign keys) are recorded as
    /// intent only; the caller owns the lookup and performs the link.
    ///
    /// An empty ChangeSet means a no-op update and the caller must skip the
    /// persistence write. Assumes the payload already passed validation;
    /// field rules are never checked here.
    fn apply_changes(&mut self, payload: &Payload) -> Result<ChangeSet, DomainError>;
}
