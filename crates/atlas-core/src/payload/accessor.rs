//! Payload accessor - typed, field-addressable view over a raw JSON payload
//!
//! Partial-update semantics hinge on keeping three field states apart:
//! a key that is missing ("leave untouched"), a key that is explicitly null
//! ("clear this field"), and a key carrying a value. Every accessor below
//! preserves that distinction.

use serde_json::{Map, Value};

use crate::error::DomainError;
use crate::value_objects::EntityId;

/// Presence state of a single payload field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState<'a> {
    /// Key not present in the payload
    Absent,
    /// Key present with an explicit null
    Null,
    /// Key present with a non-null value
    Value(&'a Value),
}

/// Parsed payload tree with typed extraction and change detection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    fields: Map<String, Value>,
}

impl Payload {
    /// Parse raw payload text
    ///
    /// Fails with [`DomainError::MalformedPayload`] when the text is not
    /// valid JSON or the top level is not an object.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let value: Value = serde_json::from_str(raw).map_err(|e| DomainError::MalformedPayload {
            detail: e.to_string(),
        })?;
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(DomainError::MalformedPayload {
                detail: format!("expected a JSON object, got {}", json_type_name(&other)),
            }),
        }
    }

    /// An empty payload (equivalent to parsing `"{}"`)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Presence state of a field
    pub fn state(&self, field: &str) -> FieldState<'_> {
        match self.fields.get(field) {
            None => FieldState::Absent,
            Some(Value::Null) => FieldState::Null,
            Some(value) => FieldState::Value(value),
        }
    }

    /// True only when the field is present AND not explicitly null
    pub fn field_exists(&self, field: &str) -> bool {
        matches!(self.state(field), FieldState::Value(_))
    }

    /// Iterate over field names in payload order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of fields in the payload
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the payload carries no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Reject any field outside the allow-list
    ///
    /// Collects every offender in a single pass over the payload, in payload
    /// order, before any extraction happens. Unconditional for every
    /// create/update request.
    pub fn reject_unknown(&self, allowed: &[&str]) -> Result<(), DomainError> {
        let unknown: Vec<String> = self
            .fields
            .keys()
            .filter(|key| !allowed.contains(&key.as_str()))
            .cloned()
            .collect();
        if unknown.is_empty() {
            Ok(())
        } else {
            Err(DomainError::UnsupportedParameter { fields: unknown })
        }
    }

    // =========================================================================
    // Typed extraction
    //
    // Absent and explicit null both extract to None (empty Vec for arrays);
    // a present value that cannot be coerced is a TypeMismatch.
    // =========================================================================

    /// Extract a string field
    pub fn get_str(&self, field: &str) -> Result<Option<String>, DomainError> {
        match self.state(field) {
            FieldState::Absent | FieldState::Null => Ok(None),
            FieldState::Value(value) => coerce_str(field, value).map(Some),
        }
    }

    /// Extract an integer field; numeric strings are accepted
    pub fn get_i64(&self, field: &str) -> Result<Option<i64>, DomainError> {
        match self.state(field) {
            FieldState::Absent | FieldState::Null => Ok(None),
            FieldState::Value(value) => coerce_i64(field, value).map(Some),
        }
    }

    /// Extract a decimal field; numeric strings are accepted
    pub fn get_f64(&self, field: &str) -> Result<Option<f64>, DomainError> {
        match self.state(field) {
            FieldState::Absent | FieldState::Null => Ok(None),
            FieldState::Value(value) => coerce_f64(field, value).map(Some),
        }
    }

    /// Extract a boolean field; no coercion from strings or numbers
    pub fn get_bool(&self, field: &str) -> Result<Option<bool>, DomainError> {
        match self.state(field) {
            FieldState::Absent | FieldState::Null => Ok(None),
            FieldState::Value(value) => coerce_bool(field, value).map(Some),
        }
    }

    /// Extract an entity-id field; numeric strings are accepted
    pub fn get_id(&self, field: &str) -> Result<Option<EntityId>, DomainError> {
        match self.state(field) {
            FieldState::Absent | FieldState::Null => Ok(None),
            FieldState::Value(value) => coerce_id(field, value).map(Some),
        }
    }

    /// Extract an ordered string array; absent or null yields an empty Vec
    pub fn get_str_array(&self, field: &str) -> Result<Vec<String>, DomainError> {
        match self.state(field) {
            FieldState::Absent | FieldState::Null => Ok(Vec::new()),
            FieldState::Value(Value::Array(items)) => items
                .iter()
                .map(|item| coerce_str(field, item))
                .collect(),
            FieldState::Value(_) => Err(type_mismatch(field, "array")),
        }
    }

    /// Extract an ordered entity-id array; absent or null yields an empty Vec
    pub fn get_id_array(&self, field: &str) -> Result<Vec<EntityId>, DomainError> {
        match self.state(field) {
            FieldState::Absent | FieldState::Null => Ok(Vec::new()),
            FieldState::Value(Value::Array(items)) => items
                .iter()
                .map(|item| coerce_id(field, item))
                .collect(),
            FieldState::Value(_) => Err(type_mismatch(field, "array")),
        }
    }

    /// Extract an entity-id array in canonical set form: sorted ascending,
    /// duplicates removed
    pub fn get_id_set(&self, field: &str) -> Result<Vec<EntityId>, DomainError> {
        let mut ids = self.get_id_array(field)?;
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }

    // =========================================================================
    // Change detection
    //
    // Absent means "leave untouched" and is never a change. Explicit null is
    // a real request to clear, so it is a change whenever the current value
    // is set. A present value is a change when it differs from current.
    // =========================================================================

    /// Did the payload request a different value for a string field?
    pub fn is_changed_str(&self, field: &str, current: Option<&str>) -> Result<bool, DomainError> {
        match self.state(field) {
            FieldState::Absent => Ok(false),
            FieldState::Null => Ok(current.is_some()),
            FieldState::Value(value) => {
                let new = coerce_str(field, value)?;
                Ok(current != Some(new.as_str()))
            }
        }
    }

    /// Did the payload request a different value for an integer field?
    pub fn is_changed_i64(&self, field: &str, current: Option<i64>) -> Result<bool, DomainError> {
        match self.state(field) {
            FieldState::Absent => Ok(false),
            FieldState::Null => Ok(current.is_some()),
            FieldState::Value(value) => {
                let new = coerce_i64(field, value)?;
                Ok(current != Some(new))
            }
        }
    }

    /// Did the payload request a different value for a decimal field?
    pub fn is_changed_f64(&self, field: &str, current: Option<f64>) -> Result<bool, DomainError> {
        match self.state(field) {
            FieldState::Absent => Ok(false),
            FieldState::Null => Ok(current.is_some()),
            FieldState::Value(value) => {
                let new = coerce_f64(field, value)?;
                Ok(match current {
                    None => true,
                    Some(cur) => new != cur,
                })
            }
        }
    }

    /// Did the payload request a different value for a boolean field?
    pub fn is_changed_bool(&self, field: &str, current: Option<bool>) -> Result<bool, DomainError> {
        match self.state(field) {
            FieldState::Absent => Ok(false),
            FieldState::Null => Ok(current.is_some()),
            FieldState::Value(value) => {
                let new = coerce_bool(field, value)?;
                Ok(current != Some(new))
            }
        }
    }

    /// Did the payload request a different value for an entity-id field?
    pub fn is_changed_id(
        &self,
        field: &str,
        current: Option<EntityId>,
    ) -> Result<bool, DomainError> {
        match self.state(field) {
            FieldState::Absent => Ok(false),
            FieldState::Null => Ok(current.is_some()),
            FieldState::Value(value) => {
                let new = coerce_id(field, value)?;
                Ok(current != Some(new))
            }
        }
    }

    /// Did the payload request a different value for a string array field?
    ///
    /// Arrays compare by ordered equality; reordering counts as a change.
    pub fn is_changed_str_array(
        &self,
        field: &str,
        current: &[String],
    ) -> Result<bool, DomainError> {
        match self.state(field) {
            FieldState::Absent => Ok(false),
            FieldState::Null => Ok(!current.is_empty()),
            FieldState::Value(_) => {
                let new = self.get_str_array(field)?;
                Ok(new != current)
            }
        }
    }

    /// Did the payload request a different membership for an entity-id set?
    ///
    /// Both sides reduce to canonical set form first, so reordering an
    /// identical membership is not a change.
    pub fn is_changed_id_set(
        &self,
        field: &str,
        current: &[EntityId],
    ) -> Result<bool, DomainError> {
        match self.state(field) {
            FieldState::Absent => Ok(false),
            FieldState::Null => Ok(!current.is_empty()),
            FieldState::Value(_) => {
                let new = self.get_id_set(field)?;
                let mut cur = current.to_vec();
                cur.sort_unstable();
                cur.dedup();
                Ok(new != cur)
            }
        }
    }
}

fn type_mismatch(field: &str, expected: &'static str) -> DomainError {
    DomainError::TypeMismatch {
        field: field.to_string(),
        expected,
    }
}

fn coerce_str(field: &str, value: &Value) -> Result<String, DomainError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        _ => Err(type_mismatch(field, "string")),
    }
}

fn coerce_i64(field: &str, value: &Value) -> Result<i64, DomainError> {
    match value {
        Value::Number(n) => n.as_i64().ok_or_else(|| type_mismatch(field, "integer")),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| type_mismatch(field, "integer")),
        _ => Err(type_mismatch(field, "integer")),
    }
}

fn coerce_f64(field: &str, value: &Value) -> Result<f64, DomainError> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| type_mismatch(field, "number")),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| type_mismatch(field, "number")),
        _ => Err(type_mismatch(field, "number")),
    }
}

fn coerce_bool(field: &str, value: &Value) -> Result<bool, DomainError> {
    match value {
        Value::Bool(b) => Ok(*b),
        _ => Err(type_mismatch(field, "boolean")),
    }
}

fn coerce_id(field: &str, value: &Value) -> Result<EntityId, DomainError> {
    coerce_i64(field, value)
        .map(EntityId::new)
        .map_err(|_| type_mismatch(field, "id"))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
