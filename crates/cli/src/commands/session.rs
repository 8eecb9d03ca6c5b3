//! Login session commands.
//!
//! # Usage
//!
//! ```bash
//! althawqa login -e customer@example.com -p 123456
//! althawqa login -e admin@althawqa.com -p admin123 --kind admin
//! althawqa whoami
//! althawqa logout
//! ```

use std::sync::Arc;

use althawqa_storefront::config::StorefrontConfig;
use althawqa_storefront::services::{DemoAuthenticator, LoginForm, LoginOutcome, LoginService};

use super::forms::print_field_errors;
use super::{CommandError, open_storage};
use crate::terminal::TerminalNotifier;

fn service(config: &StorefrontConfig) -> LoginService<DemoAuthenticator> {
    LoginService::new(
        DemoAuthenticator::new(config.submission.delay),
        open_storage(config),
        Arc::new(TerminalNotifier),
    )
}

/// Log in and print where the site would redirect.
///
/// # Errors
///
/// Returns `CommandError::NotSubmitted` for invalid input or credentials.
#[allow(clippy::print_stdout)]
pub async fn login(config: &StorefrontConfig, form: LoginForm) -> Result<(), CommandError> {
    match service(config).login(form).await? {
        LoginOutcome::LoggedIn { user, redirect_to } => {
            println!("Signed in as {} <{}>, continue to {redirect_to}", user.name, user.email);
            Ok(())
        }
        LoginOutcome::Invalid(errors) => {
            print_field_errors(&errors);
            Err(CommandError::NotSubmitted("login failed"))
        }
        LoginOutcome::Rejected(_) => Err(CommandError::NotSubmitted("login failed")),
    }
}

/// Print the logged-in user.
///
/// # Errors
///
/// Returns an error if the storage file cannot be read.
#[allow(clippy::print_stdout)]
pub fn whoami(config: &StorefrontConfig) -> Result<(), CommandError> {
    match service(config).current_user()? {
        Some(user) => println!(
            "{} <{}> ({}), since {}",
            user.name,
            user.email,
            user.kind,
            user.login_time.format("%Y-%m-%d %H:%M UTC")
        ),
        None => println!("Not logged in"),
    }
    Ok(())
}

/// Forget the stored session.
///
/// # Errors
///
/// Returns an error if the storage file cannot be written.
pub fn logout(config: &StorefrontConfig) -> Result<(), CommandError> {
    service(config).logout()?;
    Ok(())
}
