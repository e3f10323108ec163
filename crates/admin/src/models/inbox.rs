//! Inbox rows: design requests, questions and contact cards.
//!
//! Email columns are read back as plain strings. They were validated on the
//! way in, and the inbox only displays them.

use chrono::NaiveDate;
use serde::Serialize;

use prosper_core::{ContactId, ContactMethod, MessageStatus, QuestionId, RequestId, RequestStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Request {
    pub id: RequestId,
    pub name: String,
    pub email_address: Option<String>,
    pub phone_number: Option<String>,
    pub contact_method: Option<ContactMethod>,
    pub description: String,
    pub how_hear: Option<String>,
    pub status: RequestStatus,
    pub is_archived: bool,
    pub created_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Question {
    pub id: QuestionId,
    pub name: String,
    pub email_address: String,
    pub content: String,
    pub how_hear: Option<String>,
    pub status: MessageStatus,
    pub is_archived: bool,
    pub created_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub email_address: Option<String>,
    pub phone_number: Option<String>,
    pub status: MessageStatus,
    pub is_archived: bool,
    pub created_date: NaiveDate,
}
