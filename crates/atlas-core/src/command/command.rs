//! Command - an immutable description of one intended mutation
//!
//! Built once per inbound request by the transport layer, consumed exactly
//! once by the dispatcher. The raw payload stays opaque until the dispatcher
//! parses it into a [`ParsedCommand`].

use crate::command::{Action, EntityKind};
use crate::error::DomainError;
use crate::payload::Payload;
use crate::value_objects::EntityId;

/// One intended mutation: action verb, entity-type tag, optional target id,
/// resource path, and the raw payload text
#[derive(Debug, Clone)]
pub struct Command {
    id: Option<EntityId>,
    action: Action,
    entity: EntityKind,
    path: String,
    payload: String,
}

impl Command {
    /// Build a CREATE command (no target id yet)
    pub fn create(entity: EntityKind, path: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            id: None,
            action: Action::Create,
            entity,
            path: path.into(),
            payload: payload.into(),
        }
    }

    /// Build an UPDATE command targeting an existing row
    pub fn update(
        id: EntityId,
        entity: EntityKind,
        path: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id),
            action: Action::Update,
            entity,
            path: path.into(),
            payload: payload.into(),
        }
    }

    /// Build a DELETE command; carries an empty object payload so the audit
    /// row's json column stays parseable
    pub fn delete(id: EntityId, entity: EntityKind, path: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            action: Action::Delete,
            entity,
            path: path.into(),
            payload: "{}".to_string(),
        }
    }

    /// Build an UPLOAD command targeting an existing row
    pub fn upload(
        id: EntityId,
        entity: EntityKind,
        path: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id),
            action: Action::Upload,
            entity,
            path: path.into(),
            payload: payload.into(),
        }
    }

    /// Target entity id, when the command addresses an existing row
    pub fn id(&self) -> Option<EntityId> {
        self.id
    }

    /// Action verb
    pub fn action(&self) -> Action {
        self.action
    }

    /// Entity-type tag
    pub fn entity(&self) -> EntityKind {
        self.entity
    }

    /// Resource path recorded in the audit trail
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw payload text, opaque at this stage
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Derived permission key, `ACTION_ENTITY` (never stored independently)
    pub fn permission(&self) -> String {
        format!("{}_{}", self.action.as_str(), self.entity.as_str())
    }
}

/// A command whose payload has been parsed into a field-addressable tree
///
/// Request-scoped; built by the dispatcher after handler resolution.
#[derive(Debug)]
pub struct ParsedCommand {
    command: Command,
    payload: Payload,
}

impl ParsedCommand {
    /// Parse the command's raw payload
    ///
    /// Fails with [`DomainError::MalformedPayload`] before any domain code
    /// runs when the text is not a JSON object.
    pub fn parse(command: Command) -> Result<Self, DomainError> {
        let payload = Payload::parse(command.payload())?;
        Ok(Self { command, payload })
    }

    /// The underlying command
    pub fn command(&self) -> &Command {
        &self.command
    }

    /// The parsed payload tree
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Target entity id, when present
    pub fn id(&self) -> Option<EntityId> {
        self.command.id
    }

    /// Target entity id for commands that must address an existing row
    pub fn require_id(&self) -> Result<EntityId, DomainError> {
        self.command.id.ok_or_else(|| DomainError::ValidationFailed {
            field: "id".to_string(),
            rule: "a target id is required".to_string(),
        })
    }
}
