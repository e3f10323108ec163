//! Public inquiry forms and their validation.
//!
//! Each form deserializes every field as a string so a failed submission can
//! be re-rendered exactly as typed. `validate` either produces the model to
//! insert or the per-field messages to show.

use serde::{Deserialize, Serialize};

use prosper_core::{ContactMethod, Email, FieldErrors};

use crate::models::{NewContact, NewQuestion, NewRequest};

pub const EMAIL_OR_PHONE: &str = "Must provide either a phone number or an email address";
pub const INVALID_EMAIL: &str = "Invalid email address.";

/// Width of the short text columns (`name`, `phone_number`, `how_hear`).
const MAX_SHORT_FIELD: usize = 80;

/// Request form (`/requestform`).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RequestForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub contact_method: String,
    pub description: String,
    pub how_hear: String,
}

impl RequestForm {
    /// Blank form, optionally opened from a product page.
    #[must_use]
    pub fn for_product(product: Option<&str>) -> Self {
        Self {
            description: product.map(regarding).unwrap_or_default(),
            ..Self::default()
        }
    }

    /// # Errors
    ///
    /// Returns the field messages when any rule fails.
    pub fn validate(&self) -> Result<NewRequest, FieldErrors> {
        let mut errors = FieldErrors::new();

        errors.require("name", &self.name);
        check_length(&mut errors, "name", &self.name);
        errors.require("description", &self.description);
        check_length(&mut errors, "phone", &self.phone);
        check_length(&mut errors, "how_hear", &self.how_hear);

        let email = optional_email(&mut errors, &self.email);
        let phone = non_blank(&self.phone);
        if self.email.trim().is_empty() && phone.is_none() {
            errors.add("email", EMAIL_OR_PHONE);
            errors.add("phone", EMAIL_OR_PHONE);
        }

        let contact_method = ContactMethod::parse_choice(&self.contact_method)
            .unwrap_or_else(|_| {
                errors.add("contact_method", "Not a valid choice.");
                None
            });

        errors.into_result(()).map(|()| NewRequest {
            name: self.name.trim().to_owned(),
            email,
            phone,
            contact_method,
            description: self.description.trim().to_owned(),
            how_hear: non_blank(&self.how_hear),
        })
    }
}

/// Question form (`/questionform`).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct QuestionForm {
    pub name: String,
    pub email: String,
    pub content: String,
    pub how_hear: String,
}

impl QuestionForm {
    #[must_use]
    pub fn for_product(product: Option<&str>) -> Self {
        Self {
            content: product.map(regarding).unwrap_or_default(),
            ..Self::default()
        }
    }

    /// # Errors
    ///
    /// Returns the field messages when any rule fails.
    pub fn validate(&self) -> Result<NewQuestion, FieldErrors> {
        let mut errors = FieldErrors::new();

        errors.require("name", &self.name);
        check_length(&mut errors, "name", &self.name);
        errors.require("email", &self.email);
        errors.require("content", &self.content);
        check_length(&mut errors, "how_hear", &self.how_hear);

        let email = optional_email(&mut errors, &self.email);

        match (errors.into_result(()), email) {
            (Ok(()), Some(email)) => Ok(NewQuestion {
                name: self.name.trim().to_owned(),
                email,
                content: self.content.trim().to_owned(),
                how_hear: non_blank(&self.how_hear),
            }),
            (Err(errors), _) => Err(errors),
            (Ok(()), None) => {
                let mut errors = FieldErrors::new();
                errors.add("email", INVALID_EMAIL);
                Err(errors)
            }
        }
    }
}

/// Contact card form (`/contactform`).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl ContactForm {
    /// # Errors
    ///
    /// Returns the field messages when any rule fails.
    pub fn validate(&self) -> Result<NewContact, FieldErrors> {
        let mut errors = FieldErrors::new();

        errors.require("name", &self.name);
        check_length(&mut errors, "name", &self.name);
        check_length(&mut errors, "phone", &self.phone);

        let email = optional_email(&mut errors, &self.email);
        let phone = non_blank(&self.phone);
        if self.email.trim().is_empty() && phone.is_none() {
            errors.add("email", EMAIL_OR_PHONE);
            errors.add("phone", EMAIL_OR_PHONE);
        }

        errors.into_result(()).map(|()| NewContact {
            name: self.name.trim().to_owned(),
            email,
            phone,
        })
    }
}

fn regarding(product: &str) -> String {
    format!("Regarding: {product}\n\n")
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Parse a non-blank email, recording a message when it is malformed.
fn optional_email(errors: &mut FieldErrors, value: &str) -> Option<Email> {
    if value.trim().is_empty() {
        return None;
    }
    Email::parse(value)
        .map_err(|_| errors.add("email", INVALID_EMAIL))
        .ok()
}

fn check_length(errors: &mut FieldErrors, field: &str, value: &str) {
    errors.check(
        value.trim().chars().count() > MAX_SHORT_FIELD,
        field,
        "Field cannot be longer than 80 characters.",
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request() -> RequestForm {
        RequestForm {
            name: "Dana".to_string(),
            email: "dana@example.com".to_string(),
            phone: String::new(),
            contact_method: "email".to_string(),
            description: "A walnut bench".to_string(),
            how_hear: " Instagram ".to_string(),
        }
    }

    #[test]
    fn test_request_valid() {
        let new = request().validate().unwrap();
        assert_eq!(new.email.unwrap().as_str(), "dana@example.com");
        assert_eq!(new.contact_method, Some(ContactMethod::Email));
        assert_eq!(new.how_hear.as_deref(), Some("Instagram"));
        assert!(new.phone.is_none());
    }

    #[test]
    fn test_request_needs_email_or_phone() {
        let form = RequestForm {
            email: String::new(),
            ..request()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.first("email"), Some(EMAIL_OR_PHONE));
        assert_eq!(errors.first("phone"), Some(EMAIL_OR_PHONE));

        let form = RequestForm {
            email: String::new(),
            phone: "555-0100".to_string(),
            ..request()
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_request_rejects_bad_email_even_with_phone() {
        let form = RequestForm {
            email: "not-an-email".to_string(),
            phone: "555-0100".to_string(),
            ..request()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("email"), [INVALID_EMAIL]);
        assert!(!errors.has("phone"));
    }

    #[test]
    fn test_request_required_fields() {
        let form = RequestForm {
            name: "  ".to_string(),
            description: String::new(),
            ..request()
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.has("name"));
        assert!(errors.has("description"));
    }

    #[test]
    fn test_request_no_preference_and_bad_choice() {
        let form = RequestForm {
            contact_method: String::new(),
            ..request()
        };
        assert_eq!(form.validate().unwrap().contact_method, None);

        let form = RequestForm {
            contact_method: "pigeon".to_string(),
            ..request()
        };
        assert!(form.validate().unwrap_err().has("contact_method"));
    }

    #[test]
    fn test_request_for_product_prefills_description() {
        let form = RequestForm::for_product(Some("Farm Table"));
        assert!(form.description.starts_with("Regarding: Farm Table"));
        assert!(RequestForm::for_product(None).description.is_empty());
    }

    #[test]
    fn test_question_requires_valid_email() {
        let form = QuestionForm {
            name: "Lee".to_string(),
            email: String::new(),
            content: "Do you ship?".to_string(),
            how_hear: String::new(),
        };
        assert!(form.validate().unwrap_err().has("email"));

        let form = QuestionForm {
            email: "lee@".to_string(),
            ..form
        };
        assert_eq!(form.validate().unwrap_err().first("email"), Some(INVALID_EMAIL));
    }

    #[test]
    fn test_question_valid() {
        let form = QuestionForm {
            name: "Lee".to_string(),
            email: "lee@example.org".to_string(),
            content: "Do you ship?".to_string(),
            how_hear: String::new(),
        };
        let question = form.validate().unwrap();
        assert_eq!(question.how_hear, None);
        assert_eq!(question.email.domain(), "example.org");
    }

    #[test]
    fn test_contact_rules() {
        let form = ContactForm {
            name: "Sam".to_string(),
            email: String::new(),
            phone: String::new(),
        };
        assert_eq!(form.validate().unwrap_err().first("phone"), Some(EMAIL_OR_PHONE));

        let form = ContactForm {
            phone: "555-0101".to_string(),
            ..form
        };
        let contact = form.validate().unwrap();
        assert_eq!(contact.phone.as_deref(), Some("555-0101"));
        assert!(contact.email.is_none());
    }

    #[test]
    fn test_long_name_rejected() {
        let form = ContactForm {
            name: "x".repeat(81),
            email: "a@b.co".to_string(),
            phone: String::new(),
        };
        assert!(form.validate().unwrap_err().has("name"));
    }
}
