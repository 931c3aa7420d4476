//! Integration test utilities for the atlas admin server
//!
//! This crate provides helpers for running end-to-end tests against
//! the REST API over an in-memory store.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
