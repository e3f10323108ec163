//! HTTP route handlers for the public site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (featured products)
//! GET  /health                 - Health check
//! GET  /health/ready           - Readiness check (database)
//!
//! # Designs
//! GET  /designs                - Gallery of every product
//! GET  /designs/{name}         - One product with all of its images
//!
//! # Inquiries (POSTs are rate limited per client IP)
//! GET  /requestform            - Design request form (?product=)
//! POST /requestform            - Submit a design request
//! GET  /requestform/success    - Request confirmation
//! GET  /questionform           - Question form (?product=)
//! POST /questionform           - Submit a question
//! GET  /questionform/success   - Question confirmation
//! GET  /contactform            - Contact card form
//! POST /contactform            - Submit a contact card
//! GET  /contactform/success    - Contact confirmation
//! ```

pub mod designs;
pub mod home;
pub mod inquiries;
pub mod views;

use axum::{
    Router,
    handler::Handler,
    routing::{MethodRouter, get, post},
};

use crate::middleware::form_rate_limiter;
use crate::state::AppState;

/// A GET page whose POST submission sits behind the form rate limiter.
fn form_route<G, GT, P, PT>(page: G, submit: P) -> MethodRouter<AppState>
where
    G: Handler<GT, AppState>,
    P: Handler<PT, AppState>,
    GT: 'static,
    PT: 'static,
{
    get(page).merge(post(submit).layer(form_rate_limiter()))
}

/// Create the design catalog routes router.
pub fn design_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(designs::index))
        .route("/{name}", get(designs::show))
}

/// Create the inquiry form routes router.
pub fn inquiry_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/requestform",
            form_route(inquiries::request_form, inquiries::submit_request),
        )
        .route("/requestform/success", get(inquiries::request_success))
        .route(
            "/questionform",
            form_route(inquiries::question_form, inquiries::submit_question),
        )
        .route("/questionform/success", get(inquiries::question_success))
        .route(
            "/contactform",
            form_route(inquiries::contact_form, inquiries::submit_contact),
        )
        .route("/contactform/success", get(inquiries::contact_success))
}

/// Create all routes for the public site.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .nest("/designs", design_routes())
        .merge(inquiry_routes())
}
