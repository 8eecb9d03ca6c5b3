//! Field validation shared by the site's forms.

use althawqa_core::Email;

/// Notification text shown when a form has field errors.
pub const FORM_ERRORS_MESSAGE: &str = "Please correct the errors in the form";

/// A validation failure on one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Form field name, e.g. `email`.
    pub field: &'static str,
    pub message: String,
}

/// Errors collected while validating a form, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Record an error for `field`.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Message for `field`, if it failed.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Whether `value`, trimmed, has at least `min` characters.
#[must_use]
pub fn has_min_chars(value: &str, min: usize) -> bool {
    value.trim().chars().count() >= min
}

/// Parse a trimmed email, recording an error under `field` on failure.
pub fn check_email(errors: &mut FieldErrors, field: &'static str, value: &str) -> Option<Email> {
    match Email::parse(value.trim()) {
        Ok(email) => Some(email),
        Err(e) => {
            tracing::debug!(field, error = %e, "Email rejected");
            errors.add(field, "Invalid email address");
            None
        }
    }
}

/// Generic check for ad-hoc forms: every field is required, `email` must be
/// an address and `phone` digits only.
///
/// Returns one message per problem, in field order.
#[must_use]
pub fn validate_fields(fields: &[(&str, &str)]) -> Vec<String> {
    let mut errors = Vec::new();

    for (key, value) in fields {
        let value = value.trim();

        if value.is_empty() {
            errors.push(format!("Field {key} is required"));
        }

        if *key == "email" && Email::parse(value).is_err() {
            errors.push("Invalid email address".to_string());
        }

        if *key == "phone" && !value.is_empty() && !value.chars().all(|c| c.is_ascii_digit()) {
            errors.push("Phone number must contain digits only".to_string());
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_lookup() {
        let mut errors = FieldErrors::new();
        assert!(errors.is_empty());
        errors.add("name", "too short");
        errors.add("email", "bad");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("email"), Some("bad"));
        assert_eq!(errors.get("phone"), None);
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, ["name", "email"]);
    }

    #[test]
    fn test_has_min_chars_trims() {
        assert!(has_min_chars("  Al  ", 2));
        assert!(!has_min_chars("  A  ", 2));
        assert!(has_min_chars("ع ل", 3));
    }

    #[test]
    fn test_validate_fields_all_good() {
        let errors = validate_fields(&[
            ("name", "Sara"),
            ("email", "sara@example.com"),
            ("phone", "0501234567"),
        ]);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_validate_fields_reports_each_problem() {
        let errors = validate_fields(&[
            ("name", "   "),
            ("email", "sara@"),
            ("phone", "050-123"),
        ]);
        assert_eq!(
            errors,
            [
                "Field name is required",
                "Invalid email address",
                "Phone number must contain digits only",
            ]
        );
    }

    #[test]
    fn test_validate_fields_empty_email_reports_both() {
        let errors = validate_fields(&[("email", "")]);
        assert_eq!(errors.len(), 2);
    }
}
