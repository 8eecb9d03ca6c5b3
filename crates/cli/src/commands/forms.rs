//! Contact and reservation form commands.
//!
//! # Usage
//!
//! ```bash
//! althawqa contact -n "Sara" -e sara@example.com -s "Catering" -m "Do you cater weddings?"
//! althawqa reserve -n "Khalid" -e khalid@example.com -p "+966 50 123 4567" \
//!     --date 2026-03-14 --time 19:30 --guests 4
//! ```

use std::sync::Arc;

use althawqa_storefront::config::StorefrontConfig;
use althawqa_storefront::services::{
    ContactForm, ContactService, FieldErrors, FormOutcome, ReservationForm, ReservationService,
    SimulatedSubmitter,
};

use super::CommandError;
use crate::terminal::TerminalNotifier;

/// Validate and send a contact message.
///
/// # Errors
///
/// Returns `CommandError::NotSubmitted` if the form is invalid or the
/// submission fails.
pub async fn contact(config: &StorefrontConfig, form: ContactForm) -> Result<(), CommandError> {
    let service = ContactService::new(
        SimulatedSubmitter::new(&config.submission),
        Arc::new(TerminalNotifier),
    );

    finish(service.submit(&form).await, "message not sent")
}

/// Validate and book a table.
///
/// # Errors
///
/// Returns `CommandError::NotSubmitted` if the form is invalid or the
/// booking fails.
pub async fn reserve(config: &StorefrontConfig, form: ReservationForm) -> Result<(), CommandError> {
    let service = ReservationService::new(
        SimulatedSubmitter::new(&config.submission),
        Arc::new(TerminalNotifier),
    );

    finish(service.submit(&form).await, "reservation not booked")
}

fn finish<T>(outcome: FormOutcome<T>, failure: &'static str) -> Result<(), CommandError> {
    match outcome {
        FormOutcome::Submitted(_) => Ok(()),
        FormOutcome::Invalid(errors) => {
            print_field_errors(&errors);
            Err(CommandError::NotSubmitted(failure))
        }
        FormOutcome::Failed(_) => Err(CommandError::NotSubmitted(failure)),
    }
}

#[allow(clippy::print_stdout)]
pub fn print_field_errors(errors: &FieldErrors) {
    for error in errors {
        println!("  {}: {}", error.field, error.message);
    }
}
