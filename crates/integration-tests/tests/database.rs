//! Repository tests against a live database.
//!
//! These tests require a migrated `PostgreSQL` database. Each test creates
//! uniquely named rows and removes them again.

#![allow(clippy::expect_used)]

use chrono::NaiveDate;
use sqlx::PgPool;

use prosper_admin::db::{
    CatalogRepository, InboxRepository, LayoutRepository, RepositoryError, VisitorRepository,
};
use prosper_admin::models::{Question, Request, Visitor};
use prosper_core::analytics::NOT_SPECIFIED;
use prosper_core::{Email, RequestStatus, StatusUpdate};
use prosper_integration_tests::{pool, unique};
use prosper_site::db::{InquiryRepository, VisitorRepository as SiteVisitorRepository};
use prosper_site::models::{NewQuestion, NewRequest};

fn location(name: &str) -> String {
    format!("/static/images/{name}.jpeg")
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("Invalid date")
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_new_product_gets_featured_image() {
    let pool = pool().await;
    let catalog = CatalogRepository::new(&pool);
    let name = unique("Bench ");

    let (product, image) = catalog
        .create_product_with_image(&name, "Oak bench", false, &location(&name))
        .await
        .expect("Failed to create product");
    assert!(image.is_featured_img);
    assert_eq!(image.product_id, product.id);

    let second = catalog
        .add_image(product.id, &location(&unique("bench")))
        .await
        .expect("Failed to add image");
    assert!(!second.is_featured_img);

    // Deleting the featured image promotes the remaining one
    catalog
        .delete_image(image.id)
        .await
        .expect("Failed to delete image");
    let images = catalog
        .list_images(product.id)
        .await
        .expect("Failed to list images");
    assert_eq!(images.len(), 1);
    assert!(images.iter().all(|i| i.is_featured_img && i.id == second.id));

    let removed = catalog
        .delete_product(product.id)
        .await
        .expect("Failed to delete product");
    assert_eq!(removed.len(), 1);
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_make_featured_image_is_exclusive() {
    let pool = pool().await;
    let catalog = CatalogRepository::new(&pool);
    let name = unique("Shelf ");

    let (product, first) = catalog
        .create_product_with_image(&name, "", true, &location(&name))
        .await
        .expect("Failed to create product");
    let second = catalog
        .add_image(product.id, &location(&unique("shelf")))
        .await
        .expect("Failed to add image");

    catalog
        .make_featured_image(second.id)
        .await
        .expect("Failed to feature image");

    let images = catalog
        .list_images(product.id)
        .await
        .expect("Failed to list images");
    let featured: Vec<_> = images.iter().filter(|i| i.is_featured_img).map(|i| i.id).collect();
    assert_eq!(featured, [second.id]);
    assert_ne!(first.id, second.id);

    catalog
        .delete_product(product.id)
        .await
        .expect("Failed to delete product");
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_duplicate_product_name_conflicts() {
    let pool = pool().await;
    let catalog = CatalogRepository::new(&pool);
    let name = unique("Table ");

    let (product, _) = catalog
        .create_product_with_image(&name, "", false, &location(&name))
        .await
        .expect("Failed to create product");

    let duplicate = catalog
        .create_product_with_image(&name, "", false, &location(&unique("table")))
        .await;
    assert!(matches!(duplicate, Err(RepositoryError::Conflict(_))));

    catalog
        .delete_product(product.id)
        .await
        .expect("Failed to delete product");
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_upsert_product_image_reuses_product() {
    let pool = pool().await;
    let catalog = CatalogRepository::new(&pool);
    let name = unique("Board ");
    let first = location(&unique("board"));

    let image = catalog
        .upsert_product_image(&name, "Seeded", &first, true, true)
        .await
        .expect("Failed to seed image");
    let again = catalog
        .upsert_product_image(&name, "", &location(&unique("board")), false, false)
        .await
        .expect("Failed to seed second image");
    assert_eq!(image.product_id, again.product_id);

    // Re-seeding the same file replaces the row
    catalog
        .upsert_product_image(&name, "", &first, true, false)
        .await
        .expect("Failed to reseed image");

    let product = catalog
        .get_product(image.product_id)
        .await
        .expect("Failed to get product")
        .expect("Product missing");
    assert_eq!(product.description, "Seeded");
    assert!(product.is_featured_product);

    let images = catalog
        .list_images(product.id)
        .await
        .expect("Failed to list images");
    assert_eq!(images.len(), 2);
    assert_eq!(images.iter().filter(|i| i.is_featured_img).count(), 1);

    catalog
        .delete_product(product.id)
        .await
        .expect("Failed to delete product");
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_layout_upsert_and_edit() {
    let pool = pool().await;
    let layouts = LayoutRepository::new(&pool);
    let location = unique("Test Page ");

    let created = layouts
        .upsert(&location, "Header", "Hello")
        .await
        .expect("Failed to upsert layout");
    let replaced = layouts
        .upsert(&location, "Header", "Welcome")
        .await
        .expect("Failed to upsert layout");
    assert_eq!(created.id, replaced.id);

    let edited = layouts
        .update_content(created.id, "Welcome back")
        .await
        .expect("Failed to edit layout");
    assert_eq!(edited.content, "Welcome back");

    let blocks = layouts
        .blocks_for(&location)
        .await
        .expect("Failed to load blocks");
    assert_eq!(blocks.get("Header"), "Welcome back");

    sqlx::query("DELETE FROM site.layout WHERE location = $1")
        .bind(&location)
        .execute(&pool)
        .await
        .expect("Failed to clean up");
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_seeding_featured_location_elsewhere_promotes_survivor() {
    let pool = pool().await;
    let catalog = CatalogRepository::new(&pool);
    let first_name = unique("Chest ");
    let second_name = unique("Stool ");
    let moved = location(&unique("chest"));
    let kept = location(&unique("chest"));

    let featured = catalog
        .upsert_product_image(&first_name, "", &moved, true, false)
        .await
        .expect("Failed to seed featured image");
    let survivor = catalog
        .upsert_product_image(&first_name, "", &kept, false, false)
        .await
        .expect("Failed to seed second image");
    assert_eq!(featured.product_id, survivor.product_id);
    assert!(!survivor.is_featured_img);

    // The featured file now belongs to another product
    let taken = catalog
        .upsert_product_image(&second_name, "", &moved, true, false)
        .await
        .expect("Failed to reseed image");
    assert_ne!(taken.product_id, featured.product_id);
    assert!(taken.is_featured_img);

    let left = catalog
        .list_images(featured.product_id)
        .await
        .expect("Failed to list images");
    assert_eq!(left.len(), 1);
    assert!(left.iter().all(|i| i.id == survivor.id && i.is_featured_img));

    for product_id in [featured.product_id, taken.product_id] {
        catalog
            .delete_product(product_id)
            .await
            .expect("Failed to delete product");
    }
}

// ============================================================================
// Visitors
// ============================================================================

async fn visitor(pool: &PgPool, ip: &str) -> Visitor {
    VisitorRepository::new(pool)
        .list_all()
        .await
        .expect("Failed to list visitors")
        .into_iter()
        .find(|v| v.ip_address == ip)
        .expect("Visitor missing")
}

fn month_count(months: &[prosper_core::analytics::MonthlyCount], month: NaiveDate) -> i64 {
    months
        .iter()
        .find(|m| m.month == month)
        .map_or(0, |m| m.count)
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_visits_and_monthly_counts() {
    let pool = pool().await;
    let site = SiteVisitorRepository::new(&pool);
    let admin = VisitorRepository::new(&pool);
    let guest = unique("guest-");
    let owner = unique("owner-");
    let later = unique("later-");

    // Repeat visits bump the count and last visit only
    site.record_visit(&guest, ymd(1990, 3, 5))
        .await
        .expect("Failed to record visit");
    site.record_visit(&guest, ymd(1990, 3, 20))
        .await
        .expect("Failed to record visit");
    let row = visitor(&pool, &guest).await;
    assert_eq!(row.visit_count, 2);
    assert_eq!(row.first_visit, ymd(1990, 3, 5));
    assert_eq!(row.last_visit, ymd(1990, 3, 20));
    assert!(!row.is_admin);

    // An admin seen before keeps their dates and gains the flag
    site.record_visit(&owner, ymd(1990, 3, 10))
        .await
        .expect("Failed to record visit");
    admin
        .mark_admin(&owner, ymd(1990, 6, 1))
        .await
        .expect("Failed to mark admin");
    let row = visitor(&pool, &owner).await;
    assert!(row.is_admin);
    assert_eq!(row.first_visit, ymd(1990, 3, 10));

    site.record_visit(&later, ymd(1990, 5, 2))
        .await
        .expect("Failed to record visit");

    let without_admins = admin
        .visitors_per_month(true)
        .await
        .expect("Failed to count visitors");
    assert_eq!(month_count(&without_admins, ymd(1990, 3, 1)), 1);
    assert!(without_admins.iter().any(|m| m.month == ymd(1990, 4, 1) && m.count == 0));
    assert_eq!(month_count(&without_admins, ymd(1990, 5, 1)), 1);

    let with_admins = admin
        .visitors_per_month(false)
        .await
        .expect("Failed to count visitors");
    assert_eq!(month_count(&with_admins, ymd(1990, 3, 1)), 2);

    sqlx::query("DELETE FROM site.visitor WHERE ip_address = ANY($1)")
        .bind(vec![guest, owner, later])
        .execute(&pool)
        .await
        .expect("Failed to clean up");
}

// ============================================================================
// Inbox counts and marketing sources
// ============================================================================

fn request(name: &str, how_hear: &str) -> NewRequest {
    NewRequest {
        name: name.to_string(),
        email: None,
        phone: Some("856-555-0100".to_string()),
        contact_method: None,
        description: "A walnut shelf".to_string(),
        how_hear: Some(how_hear.to_string()),
    }
}

fn source_count(sources: &[prosper_core::analytics::MarketingSource], label: &str) -> i64 {
    sources
        .iter()
        .find(|s| s.label == label)
        .map_or(0, |s| s.count)
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_inbox_counts_and_marketing_sources() {
    let pool = pool().await;
    let inquiries = InquiryRepository::new(&pool);
    let inbox = InboxRepository::new(&pool);
    let visitors = VisitorRepository::new(&pool);
    let name = unique("Counted ");
    let source = unique("Flyer ");

    let unread_requests = inbox.count_unread::<Request>().await.expect("count");
    let unread_questions = inbox.count_unread::<Question>().await.expect("count");
    let completed = inbox.count_completed_requests().await.expect("count");
    let before = visitors.marketing_sources().await.expect("sources");

    let archived = inquiries
        .create_request(&request(&name, &format!("  {source} ")))
        .await
        .expect("Failed to store request");
    let finished = inquiries
        .create_request(&request(&name, &source))
        .await
        .expect("Failed to store request");
    inquiries
        .create_request(&request(&name, "   "))
        .await
        .expect("Failed to store request");
    inquiries
        .create_question(&NewQuestion {
            name: name.clone(),
            email: Email::parse("asker@example.com").expect("valid email"),
            content: "Do you ship?".to_string(),
            how_hear: Some(source.clone()),
        })
        .await
        .expect("Failed to store question");

    assert_eq!(inbox.count_unread::<Request>().await.expect("count"), unread_requests + 3);
    assert_eq!(inbox.count_unread::<Question>().await.expect("count"), unread_questions + 1);

    // Archived entries stop counting as unread; completed ones are tallied
    inbox
        .update_status::<Request>(archived, StatusUpdate::Archive)
        .await
        .expect("Failed to archive");
    inbox
        .update_status::<Request>(
            finished,
            StatusUpdate::Set(RequestStatus::Complete),
        )
        .await
        .expect("Failed to complete");
    assert_eq!(inbox.count_unread::<Request>().await.expect("count"), unread_requests + 1);
    assert_eq!(inbox.count_completed_requests().await.expect("count"), completed + 1);

    // Padded answers merge, blank answers land under "Not specified"
    let after = visitors.marketing_sources().await.expect("sources");
    assert_eq!(source_count(&after, &source), 3);
    assert_eq!(
        source_count(&after, NOT_SPECIFIED),
        source_count(&before, NOT_SPECIFIED) + 1
    );

    for table in ["site.request", "site.question"] {
        sqlx::query(&format!("DELETE FROM {table} WHERE name = $1"))
            .bind(&name)
            .execute(&pool)
            .await
            .expect("Failed to clean up");
    }
}
