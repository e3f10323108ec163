//! Domain models for the public site.

pub mod inquiry;

pub use inquiry::{NewContact, NewQuestion, NewRequest};
