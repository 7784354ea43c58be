//! Persistence for the customer registry.
//!
//! # Database
//!
//! ## Tables
//!
//! - `customer` - Customer records (`email` is UNIQUE)
//! - `tower_sessions.session` - Session storage (flash notices)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/web/migrations/` and run via:
//! ```bash
//! cargo run -p cadastro-cli -- migrate
//! ```
//!
//! Request handlers never talk to `PgPool` directly: they go through the
//! [`CustomerGateway`] trait so the handler contract can be exercised against
//! other stores.

pub mod customers;

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use cadastro_core::{CustomerId, Email};

use crate::config::DatabaseSettings;
use crate::models::{Customer, CustomerInput};

pub use customers::PgCustomerGateway;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// CRUD access to stored customers.
///
/// Every method is a single atomic storage call. `create` and `update` fail
/// with [`RepositoryError::Conflict`] when the email is already taken.
#[async_trait]
pub trait CustomerGateway: Send + Sync {
    /// All customers, ordered by name then ID.
    async fn list_all(&self) -> Result<Vec<Customer>, RepositoryError>;

    /// Look up a customer by ID.
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError>;

    /// Look up a customer by (normalized) email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<Customer>, RepositoryError>;

    /// Number of stored customers.
    async fn count(&self) -> Result<i64, RepositoryError>;

    /// Insert a new customer. The input's `id` is ignored.
    async fn create(&self, input: &CustomerInput) -> Result<Customer, RepositoryError>;

    /// Overwrite the customer with the given ID.
    ///
    /// Returns [`RepositoryError::NotFound`] if no such customer exists.
    async fn update(
        &self,
        id: CustomerId,
        input: &CustomerInput,
    ) -> Result<Customer, RepositoryError>;

    /// Remove a customer.
    ///
    /// Returns [`RepositoryError::NotFound`] if it was already gone.
    async fn delete(&self, customer: &Customer) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(settings: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(settings.connect_options())
        .await
}
