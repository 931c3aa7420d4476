//! Action and entity-type vocabulary for commands

use std::fmt;
use std::str::FromStr;

/// Verb describing the intended mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Update,
    Delete,
    Upload,
}

impl Action {
    /// Canonical uppercase form used in permission keys and audit rows
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Upload => "UPLOAD",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an Action from string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action: {0}")]
pub struct ParseActionError(pub String);

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CREATE" => Ok(Self::Create),
            "UPDATE" => Ok(Self::Update),
            "DELETE" => Ok(Self::Delete),
            "UPLOAD" => Ok(Self::Upload),
            _ => Err(ParseActionError(s.to_string())),
        }
    }
}

/// Noun tag identifying which business object a command targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Office,
    User,
    Role,
}

impl EntityKind {
    /// Canonical uppercase form used in permission keys and audit rows
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Office => "OFFICE",
            Self::User => "USER",
            Self::Role => "ROLE",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an EntityKind from string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown entity type: {0}")]
pub struct ParseEntityKindError(pub String);

impl FromStr for EntityKind {
    type Err = ParseEntityKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "OFFICE" => Ok(Self::Office),
            "USER" => Ok(Self::User),
            "ROLE" => Ok(Self::Role),
            _ => Err(ParseEntityKindError(s.to_string())),
        }
    }
}
