//! Integration tests for Prosper Wood Designs.
//!
//! # Running Tests
//!
//! ```bash
//! # Database with both schemas migrated
//! cargo run -p prosper-cli -- migrate all
//!
//! # Both servers
//! cargo run -p prosper-site &
//! cargo run -p prosper-admin &
//!
//! cargo test -p prosper-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (or `ADMIN_DATABASE_URL`) - database shared by both servers
//! - `SITE_BASE_URL` - default `http://localhost:3000`
//! - `ADMIN_BASE_URL` - default `http://localhost:3001`
//! - `ADMIN_FORM_SECRET_CODE` - only needed by the account creation test
//!
//! # Test Categories
//!
//! - `site_pages` - Public pages and inquiry forms
//! - `admin_auth` - Login, logout and account creation
//! - `admin_inbox` - Status changes, archiving and deletes
//! - `database` - Repository behavior against a live database

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use prosper_admin::services::auth::AuthService;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Response, redirect::Policy};
use secrecy::SecretString;
use sqlx::PgPool;

/// Password given to every account the tests create.
pub const TEST_PASSWORD: &str = "Test!pass1";

#[must_use]
pub fn site_base_url() -> String {
    std::env::var("SITE_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// Headers giving each client its own forwarded address, so form rate
/// limits apply per test rather than to the whole run.
fn client_headers() -> HeaderMap {
    let [a, b, ..] = uuid::Uuid::new_v4().into_bytes();
    let address = format!("198.18.{a}.{b}");
    let mut headers = HeaderMap::new();
    headers.insert(
        "x-forwarded-for",
        HeaderValue::from_str(&address).expect("Invalid test address"),
    );
    headers
}

/// Client that keeps cookies and follows redirects.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .default_headers(client_headers())
        .build()
        .expect("Failed to create HTTP client")
}

/// Client that keeps cookies but stops at the first redirect.
#[must_use]
pub fn manual_redirect_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .default_headers(client_headers())
        .redirect(Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// Connect to the shared database.
pub async fn pool() -> PgPool {
    dotenvy::dotenv().ok();
    let url = std::env::var("ADMIN_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .expect("DATABASE_URL must be set");
    prosper_admin::db::create_pool(&url)
        .await
        .expect("Failed to connect to database")
}

/// A short name no other test run will use, e.g. `it3f9c2a1b`.
#[must_use]
pub fn unique(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("{prefix}{}", id.get(..8).unwrap_or(&id))
}

/// An admin account created directly in the database.
#[derive(Debug, Clone)]
pub struct TestAdmin {
    pub username: String,
    pub first_name: String,
}

impl TestAdmin {
    pub async fn create(pool: &PgPool) -> Self {
        let username = unique("it");
        let first_name = unique("First");
        AuthService::new(pool)
            .create_admin(&username, &first_name, "Tester", TEST_PASSWORD)
            .await
            .expect("Failed to create test admin");
        Self {
            username,
            first_name,
        }
    }

    /// Remove the account.
    pub async fn delete(&self, pool: &PgPool) {
        sqlx::query("DELETE FROM admin.admin_user WHERE username = $1")
            .bind(&self.username)
            .execute(pool)
            .await
            .expect("Failed to delete test admin");
    }

    /// Submit the login form with the test password.
    pub async fn login(&self, client: &Client) -> Response {
        client
            .post(format!("{}/auth/login", admin_base_url()))
            .form(&[
                ("username", self.username.as_str()),
                ("password", TEST_PASSWORD),
                ("next", "/"),
            ])
            .send()
            .await
            .expect("Failed to submit login form")
    }
}
