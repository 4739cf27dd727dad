//! # Ledgerview Database Crate
//!
//! This crate is the application's only interface to the PostgreSQL
//! database: the connection provider plus the fixed catalog of read-only
//! query operations over the `users` and `transactions` tables.
//!
//! ## Architectural Principles
//!
//! - **Read-only adapter:** Every operation is a SELECT. The crate owns no
//!   schema, runs no migrations, and never writes a row.
//! - **Explicit handles:** Query functions take a `&mut PgConnection`
//!   checked out by the caller for the duration of one request. Nothing in
//!   this crate stashes a connection in ambient or global state, which
//!   keeps the acquisition/release lifecycle independently testable.
//! - **Fixed result shapes:** Each query declares its projection as a
//!   `FromRow` struct, so a mismatch between SQL projection and result
//!   shape fails at decode with a clear error instead of producing a
//!   silently reshaped response.
//!
//! ## Public API
//!
//! - `DbClient`: the pool wrapper; `acquire` checks out a request-scoped
//!   connection that returns to the pool on drop.
//! - `repository`: the query catalog (listings, aggregates, rankings,
//!   outlier detection).
//! - `DbError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::DbClient;
pub use error::DbError;

// Re-export sqlx so downstream crates can name driver types (e.g. in tests)
// without pinning their own copy of the dependency.
pub use sqlx;
