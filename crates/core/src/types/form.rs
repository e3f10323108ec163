//! Per-field validation messages for HTML forms.

use serde::Serialize;

/// Validation messages keyed by form field, in the order they were added.
///
/// Templates look up a field with [`FieldErrors::get`]; a field with no
/// messages yields an empty slice so the template can loop unconditionally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    fields: Vec<(String, Vec<String>)>,
}

impl FieldErrors {
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Record a message against `field`.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        let message = message.into();
        if let Some((_, messages)) = self.fields.iter_mut().find(|(name, _)| name == field) {
            messages.push(message);
        } else {
            self.fields.push((field.to_owned(), vec![message]));
        }
    }

    /// Record `message` when `condition` holds.
    pub fn check(&mut self, condition: bool, field: &str, message: &str) {
        if condition {
            self.add(field, message);
        }
    }

    /// Record "This field is required." when `value` is blank.
    pub fn require(&mut self, field: &str, value: &str) {
        self.check(value.trim().is_empty(), field, "This field is required.");
    }

    /// Messages for `field`, empty if it passed.
    #[must_use]
    pub fn get(&self, field: &str) -> &[String] {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map_or(&[], |(_, messages)| messages.as_slice())
    }

    /// First message for `field`.
    #[must_use]
    pub fn first(&self, field: &str) -> Option<&str> {
        self.get(field).first().map(String::as_str)
    }

    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        !self.get(field).is_empty()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields and their messages in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(name, messages)| (name.as_str(), messages.as_slice()))
    }

    /// `Ok(value)` when no messages were recorded, otherwise the errors.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one field failed.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_grouped_by_field() {
        let mut errors = FieldErrors::new();
        errors.add("password", "too short");
        errors.add("username", "taken");
        errors.add("password", "needs a digit");

        assert_eq!(errors.get("password"), ["too short", "needs a digit"]);
        assert_eq!(errors.first("username"), Some("taken"));
        let order: Vec<&str> = errors.iter().map(|(name, _)| name).collect();
        assert_eq!(order, ["password", "username"]);
    }

    #[test]
    fn test_missing_field_is_empty() {
        let errors = FieldErrors::new();
        assert!(errors.get("name").is_empty());
        assert!(!errors.has("name"));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_require_blank_values() {
        let mut errors = FieldErrors::new();
        errors.require("name", "   ");
        errors.require("description", "a bench");
        assert!(errors.has("name"));
        assert!(!errors.has("description"));
    }

    #[test]
    fn test_into_result() {
        assert_eq!(FieldErrors::new().into_result(5).unwrap(), 5);

        let mut errors = FieldErrors::new();
        errors.check(true, "email", "bad");
        assert!(errors.into_result(()).is_err());
    }
}
