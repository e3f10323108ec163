//! CLI subcommands.

pub mod admin;
pub mod images;
pub mod migrate;
pub mod mock;
pub mod seed;

use secrecy::SecretString;
use sqlx::PgPool;

/// Errors shared by every command that touches the database.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Read `var`, falling back to `DATABASE_URL`.
///
/// # Errors
///
/// Returns `CommandError::MissingEnvVar` when neither is set.
pub fn database_url(var: &'static str) -> Result<SecretString, CommandError> {
    dotenvy::dotenv().ok();

    std::env::var(var)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar(var))
}

/// Connect using `var` (or `DATABASE_URL`).
///
/// # Errors
///
/// Returns `CommandError` if the URL is missing or the connection fails.
pub async fn connect(var: &'static str) -> Result<PgPool, CommandError> {
    let url = database_url(var)?;
    tracing::info!("Connecting to database...");
    Ok(prosper_admin::db::create_pool(&url).await?)
}
