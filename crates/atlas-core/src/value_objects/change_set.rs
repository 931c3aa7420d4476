//! ChangeSet - the set of field changes produced by a partial update
//!
//! Built transiently by an entity's `apply_changes` implementation and
//! consumed by the dispatcher (to decide whether a persistence write is
//! needed) and by the caller (to report which fields changed). Never
//! persisted as a standalone entity.

use serde::Serialize;
use serde_json::{Map, Value};

/// Ordered mapping from changed-field-name to new value
///
/// Serializes as a flat JSON object, preserving insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ChangeSet {
    entries: Map<String, Value>,
}

impl ChangeSet {
    /// Create an empty ChangeSet
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a field change
    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.entries.insert(field.into(), value);
    }

    /// True when no field changed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of changed fields
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether a field was recorded as changed
    pub fn contains(&self, field: &str) -> bool {
        self.entries.contains_key(field)
    }

    /// Get the recorded new value for a field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.entries.get(field)
    }

    /// Iterate over changed field names in insertion order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Consume into a JSON object value
    pub fn into_json(self) -> Value {
        Value::Object(self.entries)
    }

    /// Render as a JSON object value without consuming
    pub fn to_json(&self) -> Value {
        Value::Object(self.entries.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_change_set() {
        let changes = ChangeSet::new();
        assert!(changes.is_empty());
        assert_eq!(changes.len(), 0);
        assert_eq!(changes.to_json(), json!({}));
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut changes = ChangeSet::new();
        changes.insert("nameEn", json!("HQ"));
        changes.insert("parentId", json!(2));

        assert!(!changes.is_empty());
        assert_eq!(changes.len(), 2);
        assert!(changes.contains("nameEn"));
        assert!(!changes.contains("phone"));
        assert_eq!(changes.get("parentId"), Some(&json!(2)));
    }

    #[test]
    fn test_preserves_insertion_order() {
        let mut changes = ChangeSet::new();
        changes.insert("zeta", json!(1));
        changes.insert("alpha", json!(2));

        let fields: Vec<&str> = changes.fields().collect();
        assert_eq!(fields, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_serializes_as_flat_object() {
        let mut changes = ChangeSet::new();
        changes.insert("enabled", json!(false));
        changes.insert("displayName", Value::Null);

        let json = serde_json::to_value(&changes).unwrap();
        assert_eq!(json, json!({"enabled": false, "displayName": null}));
    }
}
