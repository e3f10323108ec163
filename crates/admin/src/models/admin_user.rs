//! Admin user domain types.

use chrono::NaiveDate;

use prosper_core::AdminId;

/// An admin account. The password hash never leaves the repository.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct AdminUser {
    pub id: AdminId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub created_date: NaiveDate,
}

impl AdminUser {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A validated admin account ready to insert.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Argon2 PHC string, never the plain password
    pub password_hash: String,
}
