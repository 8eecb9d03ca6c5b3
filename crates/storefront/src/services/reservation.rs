//! Table reservations.

use std::sync::Arc;

use althawqa_core::{Email, Notification, Phone};
use chrono::{Local, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::services::notify::Notifier;
use crate::services::submit::{FormOutcome, Submitter};
use crate::services::validation::{FORM_ERRORS_MESSAGE, FieldErrors, check_email, has_min_chars};

/// Reservation form data as typed by the visitor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// `HH:MM`, 24-hour.
    pub time: String,
    pub guests: String,
    #[serde(default)]
    pub special_requests: String,
    #[serde(default)]
    pub newsletter: bool,
}

/// A validated booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub full_name: String,
    pub email: Email,
    pub phone: Phone,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub guests: u8,
    pub special_requests: Option<String>,
    pub newsletter: bool,
}

impl ReservationForm {
    /// Check every field against `today`.
    ///
    /// # Errors
    ///
    /// Returns all field errors at once.
    pub fn validate(&self, today: NaiveDate) -> Result<Reservation, FieldErrors> {
        let mut errors = FieldErrors::new();

        if !has_min_chars(&self.full_name, 2) {
            errors.add("fullName", "Name must be at least 2 characters");
        }

        let email = check_email(&mut errors, "email", &self.email);

        let phone = Phone::parse(&self.phone)
            .inspect_err(|e| tracing::debug!(error = %e, "Phone rejected"))
            .ok();
        if phone.is_none() {
            errors.add("phone", "Invalid phone number");
        }

        let date = parse_date(&mut errors, self.date.trim(), today);

        let time = match self.time.trim() {
            "" => {
                errors.add("time", "Reservation time is required");
                None
            }
            raw => {
                let parsed = NaiveTime::parse_from_str(raw, "%H:%M").ok();
                if parsed.is_none() {
                    errors.add("time", "Invalid reservation time");
                }
                parsed
            }
        };

        let guests = match self.guests.trim().parse::<u8>() {
            Ok(n) if n > 0 => Some(n),
            _ => {
                errors.add("guests", "Number of guests is required");
                None
            }
        };

        match (email, phone, date, time, guests) {
            (Some(email), Some(phone), Some(date), Some(time), Some(guests)) if errors.is_empty() => {
                let special_requests = Some(self.special_requests.trim())
                    .filter(|s| !s.is_empty())
                    .map(str::to_owned);

                Ok(Reservation {
                    full_name: self.full_name.trim().to_owned(),
                    email,
                    phone,
                    date,
                    time,
                    guests,
                    special_requests,
                    newsletter: self.newsletter,
                })
            }
            _ => Err(errors),
        }
    }
}

fn parse_date(errors: &mut FieldErrors, raw: &str, today: NaiveDate) -> Option<NaiveDate> {
    if raw.is_empty() {
        errors.add("date", "Reservation date is required");
        return None;
    }

    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) if date < today => {
            errors.add("date", "Reservations cannot be made for a past date");
            None
        }
        Ok(date) => Some(date),
        Err(_) => {
            errors.add("date", "Invalid reservation date");
            None
        }
    }
}

/// Validates and books reservations.
pub struct ReservationService<S> {
    submitter: S,
    notifier: Arc<dyn Notifier>,
}

impl<S: Submitter<Reservation>> ReservationService<S> {
    pub fn new(submitter: S, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            submitter,
            notifier,
        }
    }

    /// Validate against the local date and submit.
    pub async fn submit(&self, form: &ReservationForm) -> FormOutcome<Reservation> {
        self.submit_on(form, Local::now().date_naive()).await
    }

    /// Validate with `today` as the earliest bookable date and submit.
    #[instrument(skip(self, form))]
    pub async fn submit_on(&self, form: &ReservationForm, today: NaiveDate) -> FormOutcome<Reservation> {
        let reservation = match form.validate(today) {
            Ok(reservation) => reservation,
            Err(errors) => {
                tracing::debug!(errors = errors.len(), "Reservation form rejected");
                self.notifier.notify(Notification::error(FORM_ERRORS_MESSAGE));
                return FormOutcome::Invalid(errors);
            }
        };

        match self.submitter.submit(reservation).await {
            Ok(booked) => {
                tracing::info!(
                    date = %booked.date,
                    time = %booked.time,
                    guests = booked.guests,
                    "Reservation booked"
                );
                self.notifier.notify(Notification::success(
                    "Your table is booked! We will contact you to confirm.",
                ));
                FormOutcome::Submitted(booked)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Reservation failed");
                self.notifier.notify(Notification::error(
                    "Something went wrong while booking. Please try again.",
                ));
                FormOutcome::Failed(e)
            }
        }
    }
}
