//! Database operations for the admin dashboard.
//!
//! The admin reads and writes the same `PostgreSQL` database as the public
//! site.
//!
//! ## Tables
//!
//! - `admin.admin_user` - Admin accounts (argon2 password hashes)
//! - `admin.session` - tower-sessions store
//! - `site.product`, `site.image` - Catalog
//! - `site.layout` - Editable page text
//! - `site.request`, `site.question`, `site.contact` - Inbox
//! - `site.visitor` - Per-IP visit counts
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` (admin schema) and
//! `crates/site/migrations/` (site schema) and run via:
//! ```bash
//! cargo run -p prosper-cli -- migrate all
//! ```

pub mod admin_users;
pub mod catalog;
pub mod inbox;
pub mod layouts;
pub mod visitors;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use admin_users::AdminUserRepository;
pub use catalog::CatalogRepository;
pub use inbox::InboxRepository;
pub use layouts::LayoutRepository;
pub use visitors::VisitorRepository;

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

    /// Constraint violation (e.g., unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Map a unique-constraint violation to `Conflict`, anything else to `Database`.
pub(crate) fn conflict_or(err: sqlx::Error, message: impl FnOnce() -> String) -> RepositoryError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepositoryError::Conflict(message())
        }
        _ => RepositoryError::Database(err),
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
