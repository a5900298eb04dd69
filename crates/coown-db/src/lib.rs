//! Co-ownership database: SurrealDB connection management, schema
//! migrations, repository implementations and seed data.
//!
//! This crate provides:
//! - Connection management ([`DbManager`], [`DbConfig`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - Canonical template seeding ([`seed_templates`])
//! - Repository implementations of the `coown-core` traits
//! - Error types ([`DbError`])

mod connection;
mod error;
pub mod repository;
mod schema;
mod seed;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use schema::run_migrations;
pub use seed::{SeedOutcome, canonical_templates, seed_templates};
