//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! prosper migrate site
//! prosper migrate admin
//! prosper migrate all
//! ```
//!
//! # Environment Variables
//!
//! - `SITE_DATABASE_URL` - connection string for the site schema
//! - `ADMIN_DATABASE_URL` - connection string for the admin schema
//!
//! Both fall back to `DATABASE_URL`. The schemas usually share one database,
//! so each migrator ignores versions applied by the other.

use sqlx::migrate::Migrator;
use thiserror::Error;

use super::{CommandError, connect};

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run site schema migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the connection or a migration fails.
pub async fn site() -> Result<(), MigrationError> {
    run("site", sqlx::migrate!("../site/migrations"), "SITE_DATABASE_URL").await
}

/// Run admin schema migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the connection or a migration fails.
pub async fn admin() -> Result<(), MigrationError> {
    run("admin", sqlx::migrate!("../admin/migrations"), "ADMIN_DATABASE_URL").await
}

async fn run(
    name: &str,
    mut migrator: Migrator,
    env_var: &'static str,
) -> Result<(), MigrationError> {
    let pool = connect(env_var).await?;

    tracing::info!("Running {name} migrations...");
    migrator.set_ignore_missing(true);
    migrator.run(&pool).await?;

    tracing::info!("{name} migrations complete!");
    Ok(())
}
