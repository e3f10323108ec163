//! Authentication route handlers for admin.
//!
//! Username and password login, admin self-registration gated by the form
//! secret code, and logout.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{info, instrument, warn};

use prosper_core::FieldErrors;
use prosper_core::analytics::visit_date;

use crate::db::VisitorRepository;
use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::forms::{CreateAdminForm, LoginForm, USERNAME_TAKEN};
use crate::middleware::auth::{LOGIN_PATH, safe_next};
use crate::middleware::{
    ClientIp, OptionalAdminAuth, auth_rate_limiter, clear_current_admin, set_current_admin,
};
use crate::models::{AdminUser, CurrentAdmin};
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
struct LoginTemplate {
    form: LoginForm,
    errors: FieldErrors,
}

#[derive(Template, WebTemplate)]
#[template(path = "auth/create.html")]
struct CreateTemplate {
    form: CreateAdminForm,
    errors: FieldErrors,
}

#[derive(Debug, Default, Deserialize)]
struct NextQuery {
    next: Option<String>,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            LOGIN_PATH,
            get(login_page).merge(post(login).layer(auth_rate_limiter())),
        )
        .route(
            "/auth/create",
            get(create_page).merge(post(create).layer(auth_rate_limiter())),
        )
        .route("/auth/logout", post(logout))
}

/// GET /auth/login
///
/// Already logged in goes straight on. With development auto-login the
/// configured admin is signed in without a form.
async fn login_page(
    State(state): State<AppState>,
    OptionalAdminAuth(current): OptionalAdminAuth,
    ClientIp(ip): ClientIp,
    session: Session,
    Query(query): Query<NextQuery>,
) -> Result<Response> {
    let next = safe_next(query.next.as_deref()).to_owned();

    if current.is_some() {
        return Ok(Redirect::to(&next).into_response());
    }

    if let Some(username) = &state.config().auto_login_username {
        match AuthService::new(state.pool()).find(username).await {
            Ok(user) => {
                info!(username = %user.username, "Auto-login");
                sign_in(&state, &session, &user, ip).await?;
                return Ok(Redirect::to(&next).into_response());
            }
            Err(AuthError::UnknownUsername) => {
                warn!(%username, "Auto-login admin does not exist");
            }
            Err(e) => return Err(e.into()),
        }
    }

    let page = LoginTemplate {
        form: LoginForm {
            next,
            ..LoginForm::default()
        },
        errors: FieldErrors::new(),
    };
    Ok(page.into_response())
}

/// POST /auth/login
#[instrument(skip_all, fields(username = %form.username))]
async fn login(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    if let Err(errors) = form.validate() {
        return Ok(rejected_login(form, errors));
    }

    let user = match AuthService::new(state.pool())
        .login(&form.username, &form.password)
        .await
    {
        Ok(user) => user,
        Err(e @ AuthError::UnknownUsername) => {
            return Ok(rejected_login(form, field_error("username", &e)));
        }
        Err(e @ AuthError::IncorrectPassword) => {
            return Ok(rejected_login(form, field_error("password", &e)));
        }
        Err(e) => return Err(e.into()),
    };

    sign_in(&state, &session, &user, ip).await?;
    Ok(Redirect::to(safe_next(Some(&form.next))).into_response())
}

/// GET /auth/create
async fn create_page() -> CreateTemplate {
    CreateTemplate {
        form: CreateAdminForm::default(),
        errors: FieldErrors::new(),
    }
}

/// POST /auth/create
#[instrument(skip_all, fields(username = %form.username))]
async fn create(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    session: Session,
    Form(form): Form<CreateAdminForm>,
) -> Result<Response> {
    let config = state.config();
    let mut errors = form
        .validate(|code| config.form_secret_matches(code))
        .err()
        .unwrap_or_default();

    let auth = AuthService::new(state.pool());
    if !errors.has("username") && !auth.username_available(&form.username).await? {
        errors.add("username", USERNAME_TAKEN);
    }
    if !errors.is_empty() {
        return Ok(rejected_create(form, errors));
    }

    let user = match auth
        .create_admin(
            &form.username,
            &form.first_name,
            &form.last_name,
            &form.password,
        )
        .await
    {
        Ok(user) => user,
        Err(AuthError::UsernameTaken) => {
            let mut errors = FieldErrors::new();
            errors.add("username", USERNAME_TAKEN);
            return Ok(rejected_create(form, errors));
        }
        Err(e) => return Err(e.into()),
    };

    sign_in(&state, &session, &user, ip).await?;
    Ok(Redirect::to("/").into_response())
}

/// POST /auth/logout
async fn logout(session: Session) -> Redirect {
    if let Err(e) = clear_current_admin(&session).await {
        warn!(error = %e, "Failed to clear admin session");
    }
    clear_sentry_user();
    Redirect::to(LOGIN_PATH)
}

/// Put the admin in the session and stop counting their address as a visitor.
async fn sign_in(
    state: &AppState,
    session: &Session,
    user: &AdminUser,
    ip: Option<std::net::IpAddr>,
) -> Result<()> {
    set_current_admin(session, &CurrentAdmin::from(user)).await?;
    set_sentry_user(user.id, &user.username);

    if let Some(ip) = ip {
        // Analytics only; never block a login on it
        if let Err(e) = VisitorRepository::new(state.pool())
            .mark_admin(&ip.to_string(), visit_date(Utc::now()))
            .await
        {
            warn!(error = %e, "Failed to mark admin visitor");
        }
    }
    Ok(())
}

fn field_error(field: &str, error: &AuthError) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.add(field, error.to_string());
    errors
}

fn rejected_login(form: LoginForm, errors: FieldErrors) -> Response {
    let page = LoginTemplate { form, errors };
    (StatusCode::UNPROCESSABLE_ENTITY, page).into_response()
}

fn rejected_create(form: CreateAdminForm, errors: FieldErrors) -> Response {
    let page = CreateTemplate { form, errors };
    (StatusCode::UNPROCESSABLE_ENTITY, page).into_response()
}
