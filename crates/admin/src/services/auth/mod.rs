//! Admin authentication service.
//!
//! Username and password login with Argon2id hashes, plus the account rules
//! shared by the create-admin form and `prosper admin create`.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;
use tracing::{info, instrument};

use crate::db::{AdminUserRepository, RepositoryError};
use crate::models::admin_user::{AdminUser, NewAdmin};

pub const USERNAME_LENGTH: &str = "Username must be between 5 and 20 characters";
pub const PASSWORD_RULES: &str = "Password must contain at least 8 characters, one lowercase \
                                  letter, one uppercase letter, one number and one special \
                                  character [!@#$%^&*]";
pub const PASSWORD_MISMATCH: &str = "Passwords do not match";

const MIN_USERNAME: usize = 5;
const MAX_USERNAME: usize = 20;
const MIN_PASSWORD: usize = 8;
const PASSWORD_SPECIALS: &[char] = &['!', '@', '#', '$', '%', '^', '&', '*'];

/// `Err` with [`USERNAME_LENGTH`] unless the username is 5 to 20 characters.
///
/// # Errors
///
/// Returns the message to show next to the field.
pub fn check_username(username: &str) -> Result<(), &'static str> {
    let len = username.chars().count();
    if (MIN_USERNAME..=MAX_USERNAME).contains(&len) {
        Ok(())
    } else {
        Err(USERNAME_LENGTH)
    }
}

/// `Err` with [`PASSWORD_RULES`] unless every character class is present.
///
/// # Errors
///
/// Returns the message to show next to the field.
pub fn check_password(password: &str) -> Result<(), &'static str> {
    let strong = password.chars().count() >= MIN_PASSWORD
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(&c));
    if strong { Ok(()) } else { Err(PASSWORD_RULES) }
}

/// Hash a password into a PHC string.
///
/// # Errors
///
/// Returns `AuthError::Hash` if Argon2 rejects the input.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

/// Check `password` against a stored PHC string. A malformed hash never matches.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    PasswordHash::new(stored).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

/// Admin authentication service.
pub struct AuthService<'a> {
    users: AdminUserRepository<'a>,
}

impl<'a> AuthService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: AdminUserRepository::new(pool),
        }
    }

    /// Check a username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UnknownUsername` or `AuthError::IncorrectPassword`
    /// for bad credentials, `AuthError::Repository` on database failure.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<AdminUser, AuthError> {
        let (user, hash) = self
            .users
            .get_credentials(username.trim())
            .await?
            .ok_or(AuthError::UnknownUsername)?;

        if !verify_password(password, &hash) {
            return Err(AuthError::IncorrectPassword);
        }

        info!(admin_id = %user.id, "Admin logged in");
        Ok(user)
    }

    /// Look up an admin for development auto-login.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UnknownUsername` if the admin does not exist.
    pub async fn find(&self, username: &str) -> Result<AdminUser, AuthError> {
        self.users
            .get_by_username(username)
            .await?
            .ok_or(AuthError::UnknownUsername)
    }

    /// Whether the username is free.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` on database failure.
    pub async fn username_available(&self, username: &str) -> Result<bool, AuthError> {
        Ok(!self.users.username_exists(username.trim()).await?)
    }

    /// Hash the password and store a new admin.
    ///
    /// Callers validate the username and password first.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UsernameTaken` if the username exists.
    #[instrument(skip(self, password))]
    pub async fn create_admin(
        &self,
        username: &str,
        first_name: &str,
        last_name: &str,
        password: &str,
    ) -> Result<AdminUser, AuthError> {
        let admin = NewAdmin {
            username: username.trim().to_owned(),
            first_name: first_name.trim().to_owned(),
            last_name: last_name.trim().to_owned(),
            password_hash: hash_password(password)?,
        };

        let user = self.users.create(&admin).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::UsernameTaken,
            other => AuthError::Repository(other),
        })?;

        info!(admin_id = %user.id, "Admin created");
        Ok(user)
    }
}
