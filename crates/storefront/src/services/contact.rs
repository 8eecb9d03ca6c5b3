//! Contact form.

use std::sync::Arc;

use althawqa_core::{Email, Notification};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::services::notify::Notifier;
use crate::services::submit::{FormOutcome, Submitter};
use crate::services::validation::{FORM_ERRORS_MESSAGE, FieldErrors, check_email, has_min_chars};

/// Contact form data as typed by the visitor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// A validated contact message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: Email,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    /// Check every field.
    ///
    /// # Errors
    ///
    /// Returns all field errors at once so the form can mark each field.
    pub fn validate(&self) -> Result<ContactMessage, FieldErrors> {
        let mut errors = FieldErrors::new();

        if !has_min_chars(&self.name, 2) {
            errors.add("name", "Name must be at least 2 characters");
        }
        let email = check_email(&mut errors, "email", &self.email);
        if self.subject.trim().is_empty() {
            errors.add("subject", "Subject is required");
        }
        if !has_min_chars(&self.message, 10) {
            errors.add("message", "Message must be at least 10 characters");
        }

        match email {
            Some(email) if errors.is_empty() => Ok(ContactMessage {
                name: self.name.trim().to_owned(),
                email,
                subject: self.subject.trim().to_owned(),
                message: self.message.trim().to_owned(),
            }),
            _ => Err(errors),
        }
    }
}

/// Validates and sends contact messages.
pub struct ContactService<S> {
    submitter: S,
    notifier: Arc<dyn Notifier>,
}

impl<S: Submitter<ContactMessage>> ContactService<S> {
    pub fn new(submitter: S, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            submitter,
            notifier,
        }
    }

    /// Validate `form` and, if it passes, submit it.
    ///
    /// Exactly one notification is sent whatever the outcome.
    #[instrument(skip_all, fields(subject = %form.subject.trim()))]
    pub async fn submit(&self, form: &ContactForm) -> FormOutcome<ContactMessage> {
        let message = match form.validate() {
            Ok(message) => message,
            Err(errors) => {
                tracing::debug!(errors = errors.len(), "Contact form rejected");
                self.notifier.notify(Notification::error(FORM_ERRORS_MESSAGE));
                return FormOutcome::Invalid(errors);
            }
        };

        match self.submitter.submit(message).await {
            Ok(sent) => {
                tracing::info!(email = %sent.email, "Contact message sent");
                self.notifier.notify(Notification::success(
                    "Your message has been sent! We will get back to you soon.",
                ));
                FormOutcome::Submitted(sent)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Contact message failed");
                self.notifier.notify(Notification::error(
                    "Something went wrong while sending your message. Please try again.",
                ));
                FormOutcome::Failed(e)
            }
        }
    }
}
