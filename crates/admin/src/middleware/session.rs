//! Session middleware configuration for admin.
//!
//! `PostgreSQL`-backed sessions via tower-sessions: `SameSite=Strict`,
//! `HttpOnly`, `Secure` behind https, 24 hours of inactivity.

use sqlx::PgPool;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::AdminConfig;

/// Session cookie name for admin.
pub const SESSION_COOKIE_NAME: &str = "prosper_admin_session";

const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// The session store over `admin.session`.
///
/// # Panics
///
/// Panics if the schema or table name is rejected, which cannot happen for
/// these fixed names.
#[must_use]
pub fn session_store(pool: &PgPool) -> PostgresStore {
    PostgresStore::new(pool.clone())
        .with_schema_name("admin")
        .expect("valid schema name")
        .with_table_name("session")
        .expect("valid table name")
}

/// Create the session layer with `PostgreSQL` store.
#[must_use]
pub fn create_session_layer(
    pool: &PgPool,
    config: &AdminConfig,
) -> SessionManagerLayer<PostgresStore> {
    SessionManagerLayer::new(session_store(pool))
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_https())
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
}
