//! Visitor tracking.
//!
//! Every successful HTML page view bumps the visitor row for the client IP.
//! The write happens off the request path so a slow database never delays a
//! page.

use axum::{
    extract::{Request, State},
    http::{Method, header::CONTENT_TYPE},
    middleware::Next,
    response::Response,
};

use chrono::Utc;

use prosper_core::analytics::visit_date;

use super::client_ip;
use crate::db::VisitorRepository;
use crate::state::AppState;

/// Paths that never count as a visit.
const UNTRACKED_PREFIXES: [&str; 3] = ["/static", "/health", "/favicon"];

/// Whether a finished request counts as a page view.
#[must_use]
pub fn is_page_view(method: &Method, path: &str, response: &Response) -> bool {
    method == Method::GET
        && response.status().is_success()
        && !UNTRACKED_PREFIXES.iter().any(|p| path.starts_with(p))
        && response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("text/html"))
}

pub async fn track_visits(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let ip = client_ip::resolve(request.headers(), request.extensions());

    let response = next.run(request).await;

    if let Some(ip) = ip
        && is_page_view(&method, &path, &response)
    {
        let today = visit_date(Utc::now());
        tokio::spawn(async move {
            let ip = ip.to_string();
            let visitors = VisitorRepository::new(state.pool());
            if let Err(e) = visitors.record_visit(&ip, today).await {
                tracing::warn!(error = %e, %ip, "Failed to record visit");
            }
        });
    }

    response
}
