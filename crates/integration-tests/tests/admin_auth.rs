//! Integration tests for admin login, logout and account creation.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database
//! - The admin server running (cargo run -p prosper-admin) without auto-login

#![allow(clippy::expect_used)]

use reqwest::StatusCode;
use reqwest::header::LOCATION;

use prosper_integration_tests::{
    TestAdmin, admin_base_url, client, manual_redirect_client, pool, unique,
};

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_protected_page_redirects_to_login() {
    let resp = manual_redirect_client()
        .get(format!("{}/requests", admin_base_url()))
        .send()
        .await
        .expect("Failed to get requests");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[LOCATION], "/auth/login?next=%2Frequests");
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_admin_pages_are_not_cached() {
    let resp = client()
        .get(format!("{}/auth/login", admin_base_url()))
        .send()
        .await
        .expect("Failed to get login page");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["cache-control"], "no-store");
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_login_reports_unknown_username() {
    let resp = client()
        .post(format!("{}/auth/login", admin_base_url()))
        .form(&[
            ("username", unique("nobody").as_str()),
            ("password", "Whatever!1"),
            ("next", "/"),
        ])
        .send()
        .await
        .expect("Failed to submit login form");

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Username doesn&#39;t exist") || body.contains("Username doesn't exist"));
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_login_reports_incorrect_password() {
    let pool = pool().await;
    let admin = TestAdmin::create(&pool).await;

    let resp = client()
        .post(format!("{}/auth/login", admin_base_url()))
        .form(&[
            ("username", admin.username.as_str()),
            ("password", "Wrong!pass1"),
            ("next", "/"),
        ])
        .send()
        .await
        .expect("Failed to submit login form");

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Incorrect password"));

    admin.delete(&pool).await;
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_login_dashboard_logout() {
    let pool = pool().await;
    let admin = TestAdmin::create(&pool).await;
    let client = client();
    let base_url = admin_base_url();

    let resp = admin.login(&client).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.url().path(), "/");
    let body = resp.text().await.expect("Failed to read dashboard");
    assert!(body.contains(&admin.first_name));

    // Logged-in admins skip the login form
    let resp = client
        .get(format!("{base_url}/auth/login?next=%2Fproducts"))
        .send()
        .await
        .expect("Failed to get login page");
    assert_eq!(resp.url().path(), "/products");

    let resp = client
        .post(format!("{base_url}/auth/logout"))
        .send()
        .await
        .expect("Failed to log out");
    assert_eq!(resp.url().path(), "/auth/login");

    let resp = client
        .get(format!("{base_url}/products"))
        .send()
        .await
        .expect("Failed to get products");
    assert_eq!(resp.url().path(), "/auth/login");

    admin.delete(&pool).await;
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_login_ignores_external_next() {
    let pool = pool().await;
    let admin = TestAdmin::create(&pool).await;
    let client = manual_redirect_client();

    let resp = client
        .post(format!("{}/auth/login", admin_base_url()))
        .form(&[
            ("username", admin.username.as_str()),
            ("password", prosper_integration_tests::TEST_PASSWORD),
            ("next", "//evil.example.com/"),
        ])
        .send()
        .await
        .expect("Failed to submit login form");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[LOCATION], "/");

    admin.delete(&pool).await;
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_create_admin_rejects_wrong_secret_code() {
    let pool = pool().await;
    let username = unique("new");

    let resp = client()
        .post(format!("{}/auth/create", admin_base_url()))
        .form(&[
            ("first_name", "New"),
            ("last_name", "Admin"),
            ("username", username.as_str()),
            ("password", "Str0ng!pass"),
            ("password_retype", "Str0ng!pass"),
            ("secret_code", "definitely-not-it"),
        ])
        .send()
        .await
        .expect("Failed to submit create form");

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Incorrect secret code"));

    let (exists,): (bool,) =
        sqlx::query_as("SELECT EXISTS (SELECT 1 FROM admin.admin_user WHERE username = $1)")
            .bind(&username)
            .fetch_one(&pool)
            .await
            .expect("Failed to query admins");
    assert!(!exists);
}

#[tokio::test]
#[ignore = "Requires running admin server, database and ADMIN_FORM_SECRET_CODE"]
async fn test_create_admin_signs_in() {
    let secret = std::env::var("ADMIN_FORM_SECRET_CODE").expect("ADMIN_FORM_SECRET_CODE not set");
    let pool = pool().await;
    let username = unique("new");

    let resp = client()
        .post(format!("{}/auth/create", admin_base_url()))
        .form(&[
            ("first_name", "Fresh"),
            ("last_name", "Admin"),
            ("username", username.as_str()),
            ("password", "Str0ng!pass"),
            ("password_retype", "Str0ng!pass"),
            ("secret_code", secret.as_str()),
        ])
        .send()
        .await
        .expect("Failed to submit create form");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.url().path(), "/");

    sqlx::query("DELETE FROM admin.admin_user WHERE username = $1")
        .bind(&username)
        .execute(&pool)
        .await
        .expect("Failed to clean up");
}
