//! Request, question and contact form handlers.
//!
//! A GET renders a blank form (prefilled when opened from a product page).
//! A POST either stores the inquiry and redirects to the matching success
//! page, or re-renders the form with its messages and a 422 status.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::{info, instrument};

use prosper_core::FieldErrors;

use crate::db::InquiryRepository;
use crate::error::Result;
use crate::filters;
use crate::forms::{ContactForm, QuestionForm, RequestForm};
use crate::middleware::ClientIp;
use crate::state::AppState;

/// `?product=` on the request and question form links.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub product: Option<String>,
}

impl ProductQuery {
    fn product(&self) -> Option<&str> {
        self.product.as_deref().map(str::trim).filter(|p| !p.is_empty())
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "request_form.html")]
pub struct RequestFormTemplate {
    pub title: &'static str,
    pub product: Option<String>,
    pub form: RequestForm,
    pub errors: FieldErrors,
}

#[derive(Template, WebTemplate)]
#[template(path = "question_form.html")]
pub struct QuestionFormTemplate {
    pub title: &'static str,
    pub product: Option<String>,
    pub form: QuestionForm,
    pub errors: FieldErrors,
}

#[derive(Template, WebTemplate)]
#[template(path = "contact_form.html")]
pub struct ContactFormTemplate {
    pub title: &'static str,
    pub form: ContactForm,
    pub errors: FieldErrors,
}

#[derive(Template, WebTemplate)]
#[template(path = "success.html")]
pub struct SuccessTemplate {
    pub title: &'static str,
    pub heading: &'static str,
    pub message: &'static str,
}

fn invalid(template: impl IntoResponse) -> Response {
    (StatusCode::UNPROCESSABLE_ENTITY, template).into_response()
}

// =============================================================================
// Request form
// =============================================================================

#[instrument(skip(query))]
pub async fn request_form(Query(query): Query<ProductQuery>) -> RequestFormTemplate {
    RequestFormTemplate {
        title: "Request a Design",
        product: query.product().map(str::to_owned),
        form: RequestForm::for_product(query.product()),
        errors: FieldErrors::new(),
    }
}

#[instrument(skip(state, form))]
pub async fn submit_request(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Form(form): Form<RequestForm>,
) -> Result<Response> {
    let new_request = match form.validate() {
        Ok(request) => request,
        Err(errors) => {
            return Ok(invalid(RequestFormTemplate {
                title: "Request a Design",
                product: None,
                form,
                errors,
            }));
        }
    };

    let id = InquiryRepository::new(state.pool())
        .create_request(&new_request)
        .await?;
    info!(request_id = %id, client_ip = ?ip, "Design request received");

    Ok(Redirect::to("/requestform/success").into_response())
}

pub async fn request_success() -> SuccessTemplate {
    SuccessTemplate {
        title: "Request Sent",
        heading: "Thanks for your request!",
        message: "We'll be in touch soon to talk about your design.",
    }
}

// =============================================================================
// Question form
// =============================================================================

#[instrument(skip(query))]
pub async fn question_form(Query(query): Query<ProductQuery>) -> QuestionFormTemplate {
    QuestionFormTemplate {
        title: "Ask a Question",
        product: query.product().map(str::to_owned),
        form: QuestionForm::for_product(query.product()),
        errors: FieldErrors::new(),
    }
}

#[instrument(skip(state, form))]
pub async fn submit_question(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Form(form): Form<QuestionForm>,
) -> Result<Response> {
    let new_question = match form.validate() {
        Ok(question) => question,
        Err(errors) => {
            return Ok(invalid(QuestionFormTemplate {
                title: "Ask a Question",
                product: None,
                form,
                errors,
            }));
        }
    };

    let id = InquiryRepository::new(state.pool())
        .create_question(&new_question)
        .await?;
    info!(question_id = %id, client_ip = ?ip, "Question received");

    Ok(Redirect::to("/questionform/success").into_response())
}

pub async fn question_success() -> SuccessTemplate {
    SuccessTemplate {
        title: "Question Sent",
        heading: "Thanks for your question!",
        message: "We'll get back to you by email as soon as we can.",
    }
}

// =============================================================================
// Contact form
// =============================================================================

pub async fn contact_form() -> ContactFormTemplate {
    ContactFormTemplate {
        title: "Contact Me",
        form: ContactForm::default(),
        errors: FieldErrors::new(),
    }
}

#[instrument(skip(state, form))]
pub async fn submit_contact(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Form(form): Form<ContactForm>,
) -> Result<Response> {
    let new_contact = match form.validate() {
        Ok(contact) => contact,
        Err(errors) => {
            return Ok(invalid(ContactFormTemplate {
                title: "Contact Me",
                form,
                errors,
            }));
        }
    };

    let id = InquiryRepository::new(state.pool())
        .create_contact(&new_contact)
        .await?;
    info!(contact_id = %id, client_ip = ?ip, "Contact card received");

    Ok(Redirect::to("/contactform/success").into_response())
}

pub async fn contact_success() -> SuccessTemplate {
    SuccessTemplate {
        title: "Contact Sent",
        heading: "Thanks for reaching out!",
        message: "We'll contact you soon.",
    }
}
