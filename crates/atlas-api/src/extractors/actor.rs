//! Actor extractor
//!
//! Reads the `x-actor` header carrying the identity recorded in the audit
//! trail. Extraction never fails: a missing or blank header yields `None`
//! and the dispatcher records the actor as `"system"`.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

/// Header carrying the acting identity
pub const ACTOR_HEADER: &str = "x-actor";

/// The identity performing a mutating request, when one was supplied
#[derive(Debug, Clone)]
pub struct Actor(pub Option<String>);

impl Actor {
    /// Borrow the actor name, when present
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let actor = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from);

        Ok(Actor(actor))
    }
}
