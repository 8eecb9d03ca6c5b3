//! Phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// Fewer than the minimum number of characters after removing whitespace.
    #[error("phone number must be at least {min} characters")]
    TooShort {
        /// Minimum allowed length.
        min: usize,
    },
    /// A character other than a digit, `-`, `+`, `(` or `)`.
    #[error("phone number contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// A loosely formatted phone number as typed into the reservation form.
///
/// Whitespace is stripped; what remains must be at least 10 characters of
/// digits and the punctuation `-`, `+`, `(`, `)`.
///
/// ```
/// use althawqa_core::Phone;
///
/// assert!(Phone::parse("+966 (50) 123-4567").is_ok());
/// assert!(Phone::parse("12345").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Minimum length once whitespace is removed.
    pub const MIN_LENGTH: usize = 10;

    /// Parse a `Phone` from user input.
    ///
    /// # Errors
    ///
    /// Returns [`PhoneError::InvalidCharacter`] for letters or other symbols,
    /// and [`PhoneError::TooShort`] when fewer than 10 characters remain.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();

        if let Some(bad) = compact
            .chars()
            .find(|c| !(c.is_ascii_digit() || matches!(c, '-' | '+' | '(' | ')')))
        {
            return Err(PhoneError::InvalidCharacter(bad));
        }

        if compact.chars().count() < Self::MIN_LENGTH {
            return Err(PhoneError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }

        Ok(Self(compact))
    }

    /// Returns the number with whitespace removed.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
