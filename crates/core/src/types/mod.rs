//! Core types for Prosper.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod form;
pub mod id;
pub mod status;

pub use email::{Email, EmailError};
pub use form::FieldErrors;
pub use id::*;
pub use status::*;
