//! Inserts for the three public inquiry forms.
//!
//! New rows always start `unread` and unarchived; the column defaults carry
//! that, so the inserts never name the workflow columns.

use sqlx::PgPool;
use tracing::{debug, instrument};

use prosper_core::{ContactId, QuestionId, RequestId};

use super::RepositoryError;
use crate::models::{NewContact, NewQuestion, NewRequest};

pub struct InquiryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> InquiryRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a design request.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_request(&self, request: &NewRequest) -> Result<RequestId, RepositoryError> {
        let (id,): (RequestId,) = sqlx::query_as(
            r"
            INSERT INTO site.request
                (email_address, phone_number, name, contact_method, description, how_hear)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            ",
        )
        .bind(request.email.as_ref().map(prosper_core::Email::as_str))
        .bind(request.phone.as_deref())
        .bind(&request.name)
        .bind(request.contact_method)
        .bind(&request.description)
        .bind(request.how_hear.as_deref())
        .fetch_one(self.pool)
        .await?;

        debug!(%id, "Stored request");
        Ok(id)
    }

    /// Store a question.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self, question), fields(name = %question.name))]
    pub async fn create_question(
        &self,
        question: &NewQuestion,
    ) -> Result<QuestionId, RepositoryError> {
        let (id,): (QuestionId,) = sqlx::query_as(
            r"
            INSERT INTO site.question (email_address, name, content, how_hear)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            ",
        )
        .bind(question.email.as_str())
        .bind(&question.name)
        .bind(&question.content)
        .bind(question.how_hear.as_deref())
        .fetch_one(self.pool)
        .await?;

        debug!(%id, "Stored question");
        Ok(id)
    }

    /// Store a contact card.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self, contact), fields(name = %contact.name))]
    pub async fn create_contact(&self, contact: &NewContact) -> Result<ContactId, RepositoryError> {
        let (id,): (ContactId,) = sqlx::query_as(
            r"
            INSERT INTO site.contact (name, phone_number, email_address)
            VALUES ($1, $2, $3)
            RETURNING id
            ",
        )
        .bind(&contact.name)
        .bind(contact.phone.as_deref())
        .bind(contact.email.as_ref().map(prosper_core::Email::as_str))
        .fetch_one(self.pool)
        .await?;

        debug!(%id, "Stored contact");
        Ok(id)
    }
}
