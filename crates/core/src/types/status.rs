//! Workflow statuses for inbound inquiries.
//!
//! Requests move through a small project pipeline; questions and contact
//! cards are only ever read or unread. Archiving is orthogonal to both and is
//! stored as a separate flag, so an archived request keeps its last status.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a status string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid status: {0}")]
pub struct StatusError(pub String);

/// Progress of a custom design request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(type_name = "site.request_status"))]
pub enum RequestStatus {
    #[default]
    #[serde(rename = "unread")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "unread"))]
    Unread,
    #[serde(rename = "read")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "read"))]
    Read,
    #[serde(rename = "in progress")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "in progress"))]
    InProgress,
    #[serde(rename = "ready to deliver")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "ready to deliver"))]
    ReadyToDeliver,
    #[serde(rename = "complete")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "complete"))]
    Complete,
}

impl RequestStatus {
    /// Every status in pipeline order, for select boxes.
    pub const ALL: [Self; 5] = [
        Self::Unread,
        Self::Read,
        Self::InProgress,
        Self::ReadyToDeliver,
        Self::Complete,
    ];

    /// The stored label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unread => "unread",
            Self::Read => "read",
            Self::InProgress => "in progress",
            Self::ReadyToDeliver => "ready to deliver",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| StatusError(s.to_owned()))
    }
}

/// Read state of a question or contact card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "site.message_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    #[default]
    Unread,
    Read,
}

impl MessageStatus {
    /// Every status, for select boxes.
    pub const ALL: [Self; 2] = [Self::Unread, Self::Read];

    /// The stored label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unread => "unread",
            Self::Read => "read",
        }
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageStatus {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "unread" => Ok(Self::Unread),
            "read" => Ok(Self::Read),
            other => Err(StatusError(other.to_owned())),
        }
    }
}

/// How a customer prefers to be reached. No preference is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "site.contact_method", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum ContactMethod {
    Phone,
    Email,
}

impl ContactMethod {
    /// Parse the request form's select value; an empty value means no preference.
    ///
    /// # Errors
    ///
    /// Returns [`StatusError`] for anything other than `phone`, `email` or blank.
    pub fn parse_choice(value: &str) -> Result<Option<Self>, StatusError> {
        match value.trim() {
            "" | "none" => Ok(None),
            "phone" => Ok(Some(Self::Phone)),
            "email" => Ok(Some(Self::Email)),
            other => Err(StatusError(other.to_owned())),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for ContactMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Literal form value that archives an entry instead of changing its status.
pub const ARCHIVE: &str = "archive";

/// An admin's status change for an inbox entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusUpdate<S> {
    /// Set the archived flag and leave the status as-is.
    Archive,
    /// Replace the status.
    Set(S),
}

impl<S> FromStr for StatusUpdate<S>
where
    S: FromStr<Err = StatusError>,
{
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == ARCHIVE {
            Ok(Self::Archive)
        } else {
            s.parse().map(Self::Set)
        }
    }
}
