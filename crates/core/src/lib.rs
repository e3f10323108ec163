//! Prosper Core - shared domain types.
//!
//! Used by every crate in the workspace:
//! - `site` - Public website (catalog, inquiry forms)
//! - `admin` - Admin dashboard (content, inbox, analytics)
//! - `cli` - Migrations, seeding, image sync
//!
//! # Architecture
//!
//! The core crate holds types and pure logic only. It performs no I/O. The
//! `postgres` feature adds `sqlx` encoding for the id and status types and the
//! catalog query builder behind [`catalog::CatalogFilter`].
//!
//! # Modules
//!
//! - [`types`] - Typed ids, emails, statuses, form errors
//! - [`catalog`] - Joined product/image rows and their filter
//! - [`analytics`] - Visitor and marketing aggregation math
//! - [`content`] - Layout content blocks

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod analytics;
pub mod catalog;
pub mod content;
pub mod types;

pub use types::*;
