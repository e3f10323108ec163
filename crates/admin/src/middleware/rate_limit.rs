//! Rate limiting for the login and account creation forms.

use std::net::IpAddr;
use std::sync::Arc;

use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

use super::client_ip;

/// Keys requests by client IP: proxy headers first, then the peer address.
#[derive(Clone, Copy)]
pub struct ClientIpKeyExtractor;

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        client_ip::resolve(req.headers(), req.extensions()).ok_or(GovernorError::UnableToExtractKey)
    }
}

pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Roughly six credential attempts a minute per IP.
///
/// One token every 10 seconds, burst of 5. Only the POST handlers get this
/// layer, so the forms themselves always load.
///
/// # Panics
///
/// Does not panic: `per_second(10)` and `burst_size(5)` are always accepted
/// by `GovernorConfigBuilder`.
#[must_use]
pub fn auth_rate_limiter() -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor)
        .per_second(10)
        .burst_size(5)
        .finish()
        .expect("rate limiter config with per_second(10) and burst_size(5) is valid");
    GovernorLayer::new(Arc::new(config))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::StatusCode, routing::post};
    use tower::ServiceExt;

    fn attempt(ip: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/auth/login")
            .header("x-forwarded-for", ip)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_repeated_attempts_are_throttled_per_ip() {
        let app = Router::new().route(
            "/auth/login",
            post(|| async { "ok" }).layer(auth_rate_limiter()),
        );

        for _ in 0..5 {
            let response = app.clone().oneshot(attempt("203.0.113.9")).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app.clone().oneshot(attempt("203.0.113.9")).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

        // Other addresses keep their own budget
        let response = app.oneshot(attempt("203.0.113.10")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
