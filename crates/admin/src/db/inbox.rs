//! Inbox queries for requests, questions and contact cards.
//!
//! All three tables share the same workflow columns (`status`,
//! `is_archived`), so the repository is generic over [`InboxEntry`].

use std::fmt::Display;
use std::str::FromStr;

use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres};
use tracing::instrument;

use prosper_core::{
    ContactId, MessageStatus, QuestionId, RequestId, RequestStatus, StatusError, StatusUpdate,
};

use super::RepositoryError;
use crate::models::{Contact, Question, Request};

/// A table the inbox can list, update and delete from.
pub trait InboxEntry: for<'r> FromRow<'r, PgRow> + Send + Unpin + 'static {
    /// Singular label for logs and messages.
    const LABEL: &'static str;
    const TABLE: &'static str;
    const COLUMNS: &'static str;

    type Id: for<'q> sqlx::Encode<'q, Postgres>
        + sqlx::Type<Postgres>
        + From<i32>
        + Send
        + Copy
        + Display
        + 'static;
    type Status: for<'q> sqlx::Encode<'q, Postgres>
        + sqlx::Type<Postgres>
        + FromStr<Err = StatusError>
        + Send
        + Copy
        + Display
        + 'static;
}

impl InboxEntry for Request {
    const LABEL: &'static str = "request";
    const TABLE: &'static str = "site.request";
    const COLUMNS: &'static str = "id, name, email_address, phone_number, contact_method, \
                                   description, how_hear, status, is_archived, created_date";
    type Id = RequestId;
    type Status = RequestStatus;
}

impl InboxEntry for Question {
    const LABEL: &'static str = "question";
    const TABLE: &'static str = "site.question";
    const COLUMNS: &'static str =
        "id, name, email_address, content, how_hear, status, is_archived, created_date";
    type Id = QuestionId;
    type Status = MessageStatus;
}

impl InboxEntry for Contact {
    const LABEL: &'static str = "contact";
    const TABLE: &'static str = "site.contact";
    const COLUMNS: &'static str =
        "id, name, email_address, phone_number, status, is_archived, created_date";
    type Id = ContactId;
    type Status = MessageStatus;
}

pub struct InboxRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> InboxRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every entry, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list<T: InboxEntry>(&self) -> Result<Vec<T>, RepositoryError> {
        let sql = format!("SELECT {} FROM {} ORDER BY id DESC", T::COLUMNS, T::TABLE);
        let entries = sqlx::query_as::<_, T>(&sql).fetch_all(self.pool).await?;
        Ok(entries)
    }

    /// Archive the entry or replace its status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no entry has this id.
    #[instrument(skip_all, fields(kind = T::LABEL, id = %id))]
    pub async fn update_status<T: InboxEntry>(
        &self,
        id: T::Id,
        update: StatusUpdate<T::Status>,
    ) -> Result<(), RepositoryError> {
        let result = match update {
            StatusUpdate::Archive => {
                let sql = format!("UPDATE {} SET is_archived = TRUE WHERE id = $1", T::TABLE);
                sqlx::query(&sql).bind(id).execute(self.pool).await?
            }
            StatusUpdate::Set(status) => {
                let sql = format!("UPDATE {} SET status = $2 WHERE id = $1", T::TABLE);
                sqlx::query(&sql)
                    .bind(id)
                    .bind(status)
                    .execute(self.pool)
                    .await?
            }
        };

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no entry has this id.
    #[instrument(skip_all, fields(kind = T::LABEL, id = %id))]
    pub async fn delete<T: InboxEntry>(&self, id: T::Id) -> Result<(), RepositoryError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", T::TABLE);
        let result = sqlx::query(&sql).bind(id).execute(self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Unread entries that have not been archived.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_unread<T: InboxEntry>(&self) -> Result<i64, RepositoryError> {
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE status = 'unread' AND NOT is_archived",
            T::TABLE
        );
        let (count,): (i64,) = sqlx::query_as(&sql).fetch_one(self.pool).await?;
        Ok(count)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_completed_requests(&self) -> Result<i64, RepositoryError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM site.request WHERE status = 'complete'")
                .fetch_one(self.pool)
                .await?;
        Ok(count)
    }
}
