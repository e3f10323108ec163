//! Integration tests for the public site.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database
//! - The site server running (cargo run -p prosper-site)

#![allow(clippy::expect_used)]

use reqwest::StatusCode;

use prosper_integration_tests::{client, pool, site_base_url, unique};

// ============================================================================
// Pages
// ============================================================================

#[tokio::test]
#[ignore = "Requires running site server"]
async fn test_health() {
    let resp = client()
        .get(format!("{}/health", site_base_url()))
        .send()
        .await
        .expect("Failed to get health");

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running site server and database"]
async fn test_pages_render_with_security_headers() {
    let client = client();
    let base_url = site_base_url();

    for path in ["/", "/designs", "/requestform", "/questionform", "/contactform"] {
        let resp = client
            .get(format!("{base_url}{path}"))
            .send()
            .await
            .expect("Failed to get page");

        assert_eq!(resp.status(), StatusCode::OK, "{path}");
        let headers = resp.headers();
        assert_eq!(headers["x-frame-options"], "DENY", "{path}");
        assert_eq!(headers["x-content-type-options"], "nosniff", "{path}");
    }
}

#[tokio::test]
#[ignore = "Requires running site server and database"]
async fn test_unknown_design_is_not_found() {
    let resp = client()
        .get(format!("{}/designs/{}", site_base_url(), unique("missing")))
        .send()
        .await
        .expect("Failed to get design");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running site server and database"]
async fn test_request_form_prefills_product() {
    let resp = client()
        .get(format!("{}/requestform?product=Custom%20Cabinet", site_base_url()))
        .send()
        .await
        .expect("Failed to get request form");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Regarding: Custom Cabinet"));
}

// ============================================================================
// Inquiry submissions
// ============================================================================

#[tokio::test]
#[ignore = "Requires running site server and database"]
async fn test_request_without_contact_details_is_rejected() {
    let resp = client()
        .post(format!("{}/requestform", site_base_url()))
        .form(&[
            ("name", "No Contact"),
            ("email", ""),
            ("phone", ""),
            ("contact_method", ""),
            ("description", "A bench"),
            ("how_hear", ""),
        ])
        .send()
        .await
        .expect("Failed to submit request");

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Must provide either a phone number or an email address"));
}

#[tokio::test]
#[ignore = "Requires running site server and database"]
async fn test_request_is_stored_unread() {
    let pool = pool().await;
    let name = unique("Request ");

    let resp = client()
        .post(format!("{}/requestform", site_base_url()))
        .form(&[
            ("name", name.as_str()),
            ("email", "buyer@example.com"),
            ("phone", ""),
            ("contact_method", "email"),
            ("description", "A walnut shelf, about three feet wide."),
            ("how_hear", "Instagram"),
        ])
        .send()
        .await
        .expect("Failed to submit request");

    // Redirect followed to the confirmation page
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.url().path().ends_with("/requestform/success"));

    let (status, archived, how_hear): (String, bool, Option<String>) = sqlx::query_as(
        "SELECT status::text, is_archived, how_hear FROM site.request WHERE name = $1",
    )
    .bind(&name)
    .fetch_one(&pool)
    .await
    .expect("Request was not stored");

    assert_eq!(status, "unread");
    assert!(!archived);
    assert_eq!(how_hear.as_deref(), Some("Instagram"));

    sqlx::query("DELETE FROM site.request WHERE name = $1")
        .bind(&name)
        .execute(&pool)
        .await
        .expect("Failed to clean up");
}

#[tokio::test]
#[ignore = "Requires running site server and database"]
async fn test_question_requires_valid_email() {
    let resp = client()
        .post(format!("{}/questionform", site_base_url()))
        .form(&[
            ("name", "Curious"),
            ("email", "not-an-email"),
            ("content", "Do you ship?"),
            ("how_hear", ""),
        ])
        .send()
        .await
        .expect("Failed to submit question");

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Invalid email address."));
}

#[tokio::test]
#[ignore = "Requires running site server and database"]
async fn test_contact_card_is_stored() {
    let pool = pool().await;
    let name = unique("Contact ");

    let resp = client()
        .post(format!("{}/contactform", site_base_url()))
        .form(&[("name", name.as_str()), ("email", ""), ("phone", "856-555-0100")])
        .send()
        .await
        .expect("Failed to submit contact card");

    assert_eq!(resp.status(), StatusCode::OK);

    let (phone,): (Option<String>,) =
        sqlx::query_as("SELECT phone_number FROM site.contact WHERE name = $1")
            .bind(&name)
            .fetch_one(&pool)
            .await
            .expect("Contact was not stored");
    assert_eq!(phone.as_deref(), Some("856-555-0100"));

    sqlx::query("DELETE FROM site.contact WHERE name = $1")
        .bind(&name)
        .execute(&pool)
        .await
        .expect("Failed to clean up");
}
