//! Inbox pages for requests, questions and contact cards.
//!
//! Each kind gets its own list page; status changes and deletes share one
//! generic handler per action.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Path, State},
    response::Redirect,
    routing::{get, post},
};
use tracing::{info, instrument};

use prosper_core::{MessageStatus, RequestStatus, StatusUpdate};

use crate::db::InboxRepository;
use crate::db::inbox::InboxEntry;
use crate::error::{AppError, Result};
use crate::filters;
use crate::forms::StatusForm;
use crate::middleware::RequireAdminAuth;
use crate::models::{Contact, Question, Request};
use crate::state::AppState;

use super::views::AdminUserView;

/// An inbox kind with its own page.
pub trait InboxPage: InboxEntry {
    const PATH: &'static str;
}

impl InboxPage for Request {
    const PATH: &'static str = "/requests";
}

impl InboxPage for Question {
    const PATH: &'static str = "/questions";
}

impl InboxPage for Contact {
    const PATH: &'static str = "/contacts";
}

#[derive(Template, WebTemplate)]
#[template(path = "inbox/requests.html")]
pub struct RequestsTemplate {
    pub admin_user: AdminUserView,
    pub current_path: &'static str,
    pub entries: Vec<Request>,
    pub statuses: [RequestStatus; 5],
}

#[derive(Template, WebTemplate)]
#[template(path = "inbox/questions.html")]
pub struct QuestionsTemplate {
    pub admin_user: AdminUserView,
    pub current_path: &'static str,
    pub entries: Vec<Question>,
    pub statuses: [MessageStatus; 2],
}

#[derive(Template, WebTemplate)]
#[template(path = "inbox/contacts.html")]
pub struct ContactsTemplate {
    pub admin_user: AdminUserView,
    pub current_path: &'static str,
    pub entries: Vec<Contact>,
    pub statuses: [MessageStatus; 2],
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(Request::PATH, get(requests))
        .route(Question::PATH, get(questions))
        .route(Contact::PATH, get(contacts))
        .merge(actions::<Request>())
        .merge(actions::<Question>())
        .merge(actions::<Contact>())
}

fn actions<T: InboxPage>() -> Router<AppState> {
    Router::new()
        .route(&format!("{}/{{id}}/status", T::PATH), post(update_status::<T>))
        .route(&format!("{}/{{id}}/delete", T::PATH), post(delete::<T>))
}

/// GET /requests
async fn requests(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<RequestsTemplate> {
    Ok(RequestsTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: Request::PATH,
        entries: InboxRepository::new(state.pool()).list().await?,
        statuses: RequestStatus::ALL,
    })
}

/// GET /questions
async fn questions(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<QuestionsTemplate> {
    Ok(QuestionsTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: Question::PATH,
        entries: InboxRepository::new(state.pool()).list().await?,
        statuses: MessageStatus::ALL,
    })
}

/// GET /contacts
async fn contacts(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<ContactsTemplate> {
    Ok(ContactsTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: Contact::PATH,
        entries: InboxRepository::new(state.pool()).list().await?,
        statuses: MessageStatus::ALL,
    })
}

/// POST /{kind}/{id}/status
#[instrument(skip_all, fields(kind = T::LABEL, id = id, admin = %admin.username))]
async fn update_status<T: InboxPage>(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<StatusForm>,
) -> Result<Redirect> {
    let update: StatusUpdate<T::Status> = form
        .update()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    InboxRepository::new(state.pool())
        .update_status::<T>(T::Id::from(id), update)
        .await?;

    match update {
        StatusUpdate::Archive => info!("Archived"),
        StatusUpdate::Set(status) => info!(%status, "Status changed"),
    }
    Ok(Redirect::to(T::PATH))
}

/// POST /{kind}/{id}/delete
#[instrument(skip_all, fields(kind = T::LABEL, id = id, admin = %admin.username))]
async fn delete<T: InboxPage>(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Redirect> {
    InboxRepository::new(state.pool())
        .delete::<T>(T::Id::from(id))
        .await?;

    info!("Deleted");
    Ok(Redirect::to(T::PATH))
}
