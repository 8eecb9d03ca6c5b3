//! Authentication error types.

use thiserror::Error;

/// Errors that can occur during authentication.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Wrong password, or no such account for the requested portal.
    #[error("invalid credentials")]
    InvalidCredentials,
}

impl AuthError {
    /// Message shown to the user for this failure.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "Invalid email or password",
        }
    }
}
