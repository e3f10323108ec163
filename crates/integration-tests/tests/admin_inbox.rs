//! Integration tests for the admin inbox.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database
//! - The admin server running (cargo run -p prosper-admin)

#![allow(clippy::expect_used)]

use reqwest::StatusCode;
use sqlx::PgPool;

use prosper_integration_tests::{TestAdmin, admin_base_url, client, pool, unique};

async fn insert_question(pool: &PgPool, name: &str) -> i32 {
    let (id,): (i32,) = sqlx::query_as(
        r"
        INSERT INTO site.question (email_address, name, content, how_hear)
        VALUES ('asker@example.com', $1, 'Do you ship to Texas?', 'Facebook')
        RETURNING id
        ",
    )
    .bind(name)
    .fetch_one(pool)
    .await
    .expect("Failed to insert question");
    id
}

async fn question_state(pool: &PgPool, id: i32) -> Option<(String, bool)> {
    sqlx::query_as("SELECT status::text, is_archived FROM site.question WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .expect("Failed to read question")
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_question_status_archive_and_delete() {
    let pool = pool().await;
    let admin = TestAdmin::create(&pool).await;
    let client = client();
    let base_url = admin_base_url();
    admin.login(&client).await;

    let name = unique("Asker ");
    let id = insert_question(&pool, &name).await;

    let resp = client
        .get(format!("{base_url}/questions"))
        .send()
        .await
        .expect("Failed to get questions");
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.expect("Failed to read body").contains(&name));

    // Mark read
    let resp = client
        .post(format!("{base_url}/questions/{id}/status"))
        .form(&[("status", "read")])
        .send()
        .await
        .expect("Failed to update status");
    assert_eq!(resp.url().path(), "/questions");
    assert_eq!(question_state(&pool, id).await, Some(("read".to_string(), false)));

    // Archive keeps the status
    client
        .post(format!("{base_url}/questions/{id}/status"))
        .form(&[("status", "archive")])
        .send()
        .await
        .expect("Failed to archive");
    assert_eq!(question_state(&pool, id).await, Some(("read".to_string(), true)));

    // Request-only statuses are refused for questions
    let resp = client
        .post(format!("{base_url}/questions/{id}/status"))
        .form(&[("status", "in progress")])
        .send()
        .await
        .expect("Failed to post status");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    client
        .post(format!("{base_url}/questions/{id}/delete"))
        .send()
        .await
        .expect("Failed to delete");
    assert_eq!(question_state(&pool, id).await, None);

    admin.delete(&pool).await;
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_missing_entry_is_not_found() {
    let pool = pool().await;
    let admin = TestAdmin::create(&pool).await;
    let client = client();
    admin.login(&client).await;

    let resp = client
        .post(format!("{}/requests/{}/status", admin_base_url(), i32::MAX))
        .form(&[("status", "complete")])
        .send()
        .await
        .expect("Failed to post status");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    admin.delete(&pool).await;
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_every_admin_page_renders() {
    let pool = pool().await;
    let admin = TestAdmin::create(&pool).await;
    let client = client();
    let base_url = admin_base_url();
    admin.login(&client).await;

    for path in ["/", "/requests", "/questions", "/contacts", "/products", "/site", "/data"] {
        let resp = client
            .get(format!("{base_url}{path}"))
            .send()
            .await
            .expect("Failed to get page");
        assert_eq!(resp.status(), StatusCode::OK, "{path}");
        assert_eq!(resp.url().path(), path);
    }

    admin.delete(&pool).await;
}
