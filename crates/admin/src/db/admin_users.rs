//! Admin user repository for database operations.

use sqlx::PgPool;
use tracing::instrument;

use super::{RepositoryError, conflict_or};
use crate::models::admin_user::{AdminUser, NewAdmin};

const ADMIN_COLUMNS: &str = "id, username, first_name, last_name, created_date";

#[derive(sqlx::FromRow)]
struct CredentialRow {
    #[sqlx(flatten)]
    user: AdminUser,
    password_hash: String,
}

/// Repository for admin user database operations.
pub struct AdminUserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminUserRepository<'a> {
    /// Create a new admin user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all admin users, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<AdminUser>, RepositoryError> {
        let users = sqlx::query_as(&format!(
            "SELECT {ADMIN_COLUMNS} FROM admin.admin_user ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }

    /// Get an admin user by username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_username(&self, username: &str) -> Result<Option<AdminUser>, RepositoryError> {
        let user = sqlx::query_as(&format!(
            "SELECT {ADMIN_COLUMNS} FROM admin.admin_user WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// The stored password hash for `username`, with the user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_credentials(
        &self,
        username: &str,
    ) -> Result<Option<(AdminUser, String)>, RepositoryError> {
        let row: Option<CredentialRow> = sqlx::query_as(&format!(
            "SELECT {ADMIN_COLUMNS}, password_hash FROM admin.admin_user WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| (r.user, r.password_hash)))
    }

    /// Whether `username` is already taken.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn username_exists(&self, username: &str) -> Result<bool, RepositoryError> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM admin.admin_user WHERE username = $1)",
        )
        .bind(username)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    /// Create a new admin user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username already exists.
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self, admin), fields(username = %admin.username))]
    pub async fn create(&self, admin: &NewAdmin) -> Result<AdminUser, RepositoryError> {
        let user = sqlx::query_as(&format!(
            r"
            INSERT INTO admin.admin_user (username, password_hash, first_name, last_name)
            VALUES ($1, $2, $3, $4)
            RETURNING {ADMIN_COLUMNS}
            "
        ))
        .bind(&admin.username)
        .bind(&admin.password_hash)
        .bind(&admin.first_name)
        .bind(&admin.last_name)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_or(e, || format!("username {} already exists", admin.username)))?;

        Ok(user)
    }
}
