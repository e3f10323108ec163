//! Validated inquiry submissions.
//!
//! These are produced by the form validators in [`crate::forms`] and are the
//! only way to insert an inquiry, so every stored row has passed validation.

use prosper_core::{ContactMethod, Email};

/// A custom design request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRequest {
    pub name: String,
    pub email: Option<Email>,
    pub phone: Option<String>,
    pub contact_method: Option<ContactMethod>,
    pub description: String,
    pub how_hear: Option<String>,
}

/// A general question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub name: String,
    pub email: Email,
    pub content: String,
    pub how_hear: Option<String>,
}

/// A "call me back" contact card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub email: Option<Email>,
    pub phone: Option<String>,
}
