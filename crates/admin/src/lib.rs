//! Prosper Wood Designs admin dashboard.
//!
//! Products and images, page text, the inquiry inbox and visitor analytics.
//! The image store and the auth service are also used by the `prosper` CLI.
//!
//! # Security
//!
//! Every page except login and admin creation requires a session. Creating
//! an admin requires the form secret code.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod forms;
pub mod greeting;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, middleware::from_fn, routing::get};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tower_sessions::SessionManagerLayer;
use tower_sessions::SessionStore;
use tracing::Span;

use state::AppState;

/// Admin stylesheet and other checked-in assets.
pub const STATIC_DIR: &str = "crates/admin/static";

/// Build the full admin router around a session layer.
///
/// Tests pass a `MemoryStore` layer; the binary uses
/// [`middleware::create_session_layer`].
pub fn app<S>(state: AppState, sessions: SessionManagerLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    let image_dir = state.images().dir().to_path_buf();

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .nest_service("/static/images", ServeDir::new(image_dir))
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(sessions)
        .layer(from_fn(middleware::security_headers_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Liveness health check. Does not touch the database.
async fn health() -> &'static str {
    "ok"
}

/// Readiness check: 503 when the database is unreachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
