//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! prosper admin create -u jmanning -f John -l Manning -p 'Str0ng!pass'
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)

use thiserror::Error;

use prosper_admin::services::auth::{AuthError, AuthService, check_password, check_username};
use prosper_core::AdminId;

use super::{CommandError, connect};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Username or password failed the account policy.
    #[error("{0}")]
    Invalid(&'static str),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Create a new admin user under the same rules as the sign-up form.
///
/// # Errors
///
/// Returns `AdminError::Invalid` for a bad username or password,
/// `AuthError::UsernameTaken` if the username exists.
pub async fn create_user(
    username: &str,
    first_name: &str,
    last_name: &str,
    password: &str,
) -> Result<AdminId, AdminError> {
    let username = username.trim();
    validate(username, password)?;

    let pool = connect("ADMIN_DATABASE_URL").await?;

    tracing::info!("Creating admin user: {username}");
    let admin = AuthService::new(&pool)
        .create_admin(username, first_name, last_name, password)
        .await?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Username: {}, Name: {}",
        admin.id,
        admin.username,
        admin.full_name()
    );
    Ok(admin.id)
}

fn validate(username: &str, password: &str) -> Result<(), AdminError> {
    check_username(username).map_err(AdminError::Invalid)?;
    check_password(password).map_err(AdminError::Invalid)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_uses_account_policy() {
        assert!(validate("jmanning", "Str0ng!pass").is_ok());
        assert!(matches!(validate("jm", "Str0ng!pass"), Err(AdminError::Invalid(_))));
        assert!(matches!(validate("jmanning", "weak"), Err(AdminError::Invalid(_))));
    }
}
