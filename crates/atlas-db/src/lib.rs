//! # atlas-db
//!
//! Database layer implementing the store traits from `atlas-core`.
//!
//! ## Overview
//!
//! This crate provides two implementations of the same store contract:
//!
//! - Connection pool management for PostgreSQL via SQLx
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - [`PgStore`], the production PostgreSQL store
//! - [`MemoryStore`], an in-memory store for tests and local runs
//!
//! Mutations go through a transactional session opened with
//! `Store::begin`; the business write and the audit write commit or roll
//! back together.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use atlas_db::pool::{create_pool, DatabaseConfig};
//! use atlas_db::PgStore;
//! use atlas_core::traits::Store;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env();
//!     let pool = create_pool(&config).await?;
//!     let store = PgStore::new(pool);
//!
//!     // Use the store...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod store;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_env, DatabaseConfig, PgPool};
pub use store::{MemoryStore, PgStore};
