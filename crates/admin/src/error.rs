//! Unified error handling for admin.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use prosper_core::AdminId;

use crate::db::RepositoryError;
use crate::filters;
use crate::services::auth::AuthError;
use crate::storage::StorageError;

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Image file or bucket operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Authentication service failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Template rendering failed.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(RepositoryError::NotFound) | Self::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Database(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Storage(StorageError::InvalidLocation(_)) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Auth(AuthError::UnknownUsername | AuthError::IncorrectPassword) => {
                StatusCode::UNAUTHORIZED
            }
            Self::Database(_)
            | Self::Storage(_)
            | Self::Auth(_)
            | Self::Session(_)
            | Self::Template(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::Database(RepositoryError::NotFound) => "Not found".to_string(),
            Self::Database(RepositoryError::Conflict(msg)) => msg.clone(),
            Self::NotFound(_) | Self::BadRequest(_) => self.to_string(),
            _ if self.status().is_server_error() => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate {
    status: u16,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        let page = ErrorTemplate {
            status: status.as_u16(),
            message: self.public_message(),
        };
        match page.render() {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to render error page");
                (status, self.public_message()).into_response()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for the logged-in admin.
pub fn set_sentry_user(admin_id: AdminId, username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(admin_id.to_string()),
            username: Some(username.to_owned()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
