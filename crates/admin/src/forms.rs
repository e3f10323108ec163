//! Admin forms and their validation.
//!
//! Like the public forms, every field arrives as a string so a rejected
//! submission re-renders as typed.

use serde::{Deserialize, Serialize};

use prosper_core::{FieldErrors, StatusError, StatusUpdate};

use crate::services::auth::{PASSWORD_MISMATCH, check_password, check_username};

pub const INCORRECT_SECRET: &str = "Incorrect secret code";
pub const USERNAME_TAKEN: &str = "Sorry, this username is already in-use";

/// Width of `site.product.name`.
const MAX_PRODUCT_NAME: usize = 80;

/// `/auth/login`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    /// Page to return to, carried through the form as a hidden field
    pub next: String,
}

impl LoginForm {
    /// # Errors
    ///
    /// Returns the field messages when a field is blank.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("username", &self.username);
        errors.require("password", &self.password);
        errors.into_result(())
    }
}

/// `/auth/create`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CreateAdminForm {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(skip_serializing)]
    pub password_retype: String,
    #[serde(skip_serializing)]
    pub secret_code: String,
}

impl CreateAdminForm {
    /// Everything except username uniqueness, which needs the database.
    ///
    /// `secret_matches` compares the submitted code with the configured one.
    ///
    /// # Errors
    ///
    /// Returns the field messages when any rule fails.
    pub fn validate(&self, secret_matches: impl FnOnce(&str) -> bool) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        errors.require("first_name", &self.first_name);
        errors.require("last_name", &self.last_name);

        errors.require("username", &self.username);
        if let Err(message) = check_username(self.username.trim()) {
            errors.add("username", message);
        }

        errors.require("password", &self.password);
        if let Err(message) = check_password(&self.password) {
            errors.add("password", message);
        }
        errors.check(
            self.password != self.password_retype,
            "password_retype",
            PASSWORD_MISMATCH,
        );

        errors.require("secret_code", &self.secret_code);
        errors.check(
            !self.secret_code.is_empty() && !secret_matches(&self.secret_code),
            "secret_code",
            INCORRECT_SECRET,
        );

        errors.into_result(())
    }
}

/// Text fields of a product; the multipart handlers fill this in part by part.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    /// Checkbox: present (any value) means checked
    pub is_featured_product: Option<String>,
}

impl ProductForm {
    #[must_use]
    pub const fn featured(&self) -> bool {
        self.is_featured_product.is_some()
    }

    /// # Errors
    ///
    /// Returns the field messages when the name is blank or too long.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("name", &self.name);
        errors.check(
            self.name.trim().chars().count() > MAX_PRODUCT_NAME,
            "name",
            "Name must be at most 80 characters",
        );
        errors.into_result(())
    }
}

/// `/site/layouts/{id}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LayoutForm {
    pub content: String,
}

/// Status select on every inbox row.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

impl StatusForm {
    /// # Errors
    ///
    /// Returns `StatusError` when the value is neither a status nor `archive`.
    pub fn update<S>(&self) -> Result<StatusUpdate<S>, StatusError>
    where
        S: std::str::FromStr<Err = StatusError>,
    {
        self.status.parse()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::auth::{PASSWORD_RULES, USERNAME_LENGTH};
    use prosper_core::{MessageStatus, RequestStatus};

    fn valid_create() -> CreateAdminForm {
        CreateAdminForm {
            first_name: "John".to_string(),
            last_name: "Manning".to_string(),
            username: "jmanning".to_string(),
            password: "Walnut#2024".to_string(),
            password_retype: "Walnut#2024".to_string(),
            secret_code: "sawdust".to_string(),
        }
    }

    #[test]
    fn test_create_admin_accepts_valid_form() {
        assert!(valid_create().validate(|code| code == "sawdust").is_ok());
    }

    #[test]
    fn test_create_admin_collects_every_problem() {
        let form = CreateAdminForm {
            first_name: String::new(),
            username: "jm".to_string(),
            password: "walnut".to_string(),
            password_retype: "walnut!".to_string(),
            secret_code: "guess".to_string(),
            ..valid_create()
        };

        let errors = form.validate(|code| code == "sawdust").unwrap_err();
        assert!(errors.has("first_name"));
        assert_eq!(errors.first("username"), Some(USERNAME_LENGTH));
        assert_eq!(errors.first("password"), Some(PASSWORD_RULES));
        assert_eq!(errors.first("password_retype"), Some(PASSWORD_MISMATCH));
        assert_eq!(errors.first("secret_code"), Some(INCORRECT_SECRET));
    }

    #[test]
    fn test_create_admin_form_never_echoes_secrets() {
        let json = serde_json::to_string(&valid_create()).unwrap();
        assert!(!json.contains("Walnut"));
        assert!(!json.contains("sawdust"));
        assert!(json.contains("jmanning"));
    }

    #[test]
    fn test_login_requires_both_fields() {
        let errors = LoginForm::default().validate().unwrap_err();
        assert!(errors.has("username"));
        assert!(errors.has("password"));
    }

    #[test]
    fn test_product_name_rules() {
        let form = ProductForm {
            name: "x".repeat(81),
            ..ProductForm::default()
        };
        assert!(form.validate().unwrap_err().has("name"));
        assert!(!form.featured());

        let form = ProductForm {
            name: "Cornhole Board".to_string(),
            is_featured_product: Some("on".to_string()),
            ..ProductForm::default()
        };
        assert!(form.validate().is_ok());
        assert!(form.featured());
    }

    #[test]
    fn test_status_form_parses_per_kind() {
        let form = StatusForm {
            status: "in progress".to_string(),
        };
        assert_eq!(
            form.update::<RequestStatus>().unwrap(),
            StatusUpdate::Set(RequestStatus::InProgress)
        );
        assert!(form.update::<MessageStatus>().is_err());

        let form = StatusForm {
            status: "archive".to_string(),
        };
        assert_eq!(
            form.update::<MessageStatus>().unwrap(),
            StatusUpdate::Archive
        );
    }
}
