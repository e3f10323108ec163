//! Database access for the public site.
//!
//! # Schema: `site`
//!
//! The site only reads the catalog and layout text, and only ever inserts
//! inquiries and visitor rows:
//!
//! - `product`, `image` - Catalog (read)
//! - `layout` - Editable page text (read)
//! - `request`, `question`, `contact` - Inquiry forms (insert)
//! - `visitor` - Per-IP visit counter (upsert)
//!
//! # Migrations
//!
//! Migrations live in `crates/site/migrations/` and run via:
//! ```bash
//! cargo run -p prosper-cli -- migrate site
//! ```

pub mod catalog;
pub mod inquiries;
pub mod layouts;
pub mod visitors;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use catalog::CatalogRepository;
pub use inquiries::InquiryRepository;
pub use layouts::LayoutRepository;
pub use visitors::VisitorRepository;

/// Errors from site repositories.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),
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
