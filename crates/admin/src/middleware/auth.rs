//! Authentication extractors for admin.
//!
//! Handlers that need a logged-in admin take [`RequireAdminAuth`]; anyone
//! without a session is sent to the login page with `next` set to the page
//! they asked for.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, Uri, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentAdmin, session_keys};

pub const LOGIN_PATH: &str = "/auth/login";

/// Extractor that requires admin authentication.
///
/// ```rust,ignore
/// async fn dashboard(RequireAdminAuth(admin): RequireAdminAuth) -> String {
///     format!("Hello, {}!", admin.first_name)
/// }
/// ```
pub struct RequireAdminAuth(pub CurrentAdmin);

/// Rejection when no admin is logged in.
pub enum AdminAuthRejection {
    /// Redirect to the login page, returning to `next` afterwards.
    RedirectToLogin { next: String },
    /// The session layer is missing.
    NoSession,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin { next } => Redirect::to(&login_url(&next)).into_response(),
            Self::NoSession => {
                tracing::error!("Admin route reached without a session layer");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdminAuth
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AdminAuthRejection::NoSession)?;

        let admin: CurrentAdmin = session
            .get(session_keys::CURRENT_ADMIN)
            .await
            .ok()
            .flatten()
            .ok_or_else(|| AdminAuthRejection::RedirectToLogin {
                next: path_and_query(&parts.uri),
            })?;

        Ok(Self(admin))
    }
}

/// Extractor that optionally gets the current admin.
pub struct OptionalAdminAuth(pub Option<CurrentAdmin>);

impl<S> FromRequestParts<S> for OptionalAdminAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let admin = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(admin))
    }
}

/// Store the admin in the session, rotating the session id first.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_admin(
    session: &Session,
    admin: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_ADMIN, admin).await
}

/// Drop the whole session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be removed from the store.
pub async fn clear_current_admin(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

/// `/auth/login?next=...`, or the bare login path when `next` is the root.
#[must_use]
pub fn login_url(next: &str) -> String {
    if next.is_empty() || next == "/" {
        LOGIN_PATH.to_string()
    } else {
        format!("{LOGIN_PATH}?next={}", urlencoding::encode(next))
    }
}

/// Where to go after login: `next` when it is a path on this site, else `/`.
#[must_use]
pub fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.starts_with("/\\")
                && !path.starts_with(LOGIN_PATH) =>
        {
            path
        }
        _ => "/",
    }
}

fn path_and_query(uri: &Uri) -> String {
    uri.path_and_query()
        .map_or_else(|| uri.path().to_string(), ToString::to_string)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, routing::get};
    use tower::ServiceExt;
    use tower_sessions::{MemoryStore, SessionManagerLayer};

    #[test]
    fn test_login_url_encodes_next() {
        assert_eq!(login_url("/"), "/auth/login");
        assert_eq!(
            login_url("/requests?page=2"),
            "/auth/login?next=%2Frequests%3Fpage%3D2"
        );
    }

    #[test]
    fn test_safe_next_rejects_offsite_targets() {
        assert_eq!(safe_next(Some("/products")), "/products");
        assert_eq!(safe_next(Some("//evil.example")), "/");
        assert_eq!(safe_next(Some("/\\evil.example")), "/");
        assert_eq!(safe_next(Some("https://evil.example")), "/");
        assert_eq!(safe_next(Some("/auth/login")), "/");
        assert_eq!(safe_next(None), "/");
    }

    async fn protected(RequireAdminAuth(admin): RequireAdminAuth) -> String {
        admin.username
    }

    #[tokio::test]
    async fn test_anonymous_request_redirects_with_next() {
        let app = Router::new()
            .route("/questions", get(protected))
            .layer(SessionManagerLayer::new(MemoryStore::default()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/questions")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()["location"],
            "/auth/login?next=%2Fquestions"
        );
    }
}
