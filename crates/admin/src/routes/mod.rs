//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                       - Liveness
//! GET  /health/ready                 - Readiness (database)
//!
//! # Auth
//! GET  /auth/login[?next=]           - Login page (auto-login in development)
//! POST /auth/login                   - Check username and password
//! GET  /auth/create                  - Create-admin page
//! POST /auth/create                  - Create an admin (needs the secret code)
//! POST /auth/logout                  - Logout
//!
//! # Dashboard
//! GET  /                             - Greeting, visitor and marketing charts
//!
//! # Inbox
//! GET  /requests                     - Design requests, newest first
//! GET  /questions                    - Questions, newest first
//! GET  /contacts                     - Contact cards, newest first
//! POST /{kind}/{id}/status           - Change status or archive
//! POST /{kind}/{id}/delete           - Delete
//!
//! # Products
//! GET  /products                     - Products, featured products, images
//! POST /products/new                 - Create with featured image (multipart)
//! POST /products/{id}/update         - Name, description, featured flag
//! POST /products/{id}/images         - Add, delete, re-feature images (multipart)
//! POST /products/{id}/delete         - Delete product and its files
//!
//! # Site
//! GET  /site                         - Page text by location, visitor totals
//! POST /site/layouts/{id}            - Replace one block's text
//!
//! # Data
//! GET  /data                         - Every table, unformatted
//! ```
//!
//! Everything outside `/auth` and `/health` takes `RequireAdminAuth`.

use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod dashboard;
pub mod data;
pub mod inbox;
pub mod products;
pub mod site;
pub mod views;

pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(dashboard::router())
        .merge(inbox::router())
        .merge(products::router())
        .merge(site::router())
        .merge(data::router())
}
