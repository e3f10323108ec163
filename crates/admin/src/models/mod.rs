//! Domain models for admin.

pub mod admin_user;
pub mod catalog;
pub mod inbox;
pub mod layout;
pub mod session;
pub mod visitor;

pub use admin_user::{AdminUser, NewAdmin};
pub use catalog::{Image, Product};
pub use inbox::{Contact, Question, Request};
pub use layout::Layout;
pub use session::{CurrentAdmin, keys as session_keys};
pub use visitor::Visitor;
