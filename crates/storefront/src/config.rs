//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `ALTHAWQA_STORAGE_PATH` - File backing the local key-value store
//!   (default: althawqa-storage.json)
//! - `ALTHAWQA_CART_KEY` - Storage slot holding the cart (default: restaurantCart)
//! - `ALTHAWQA_CHECKOUT_DELAY_MS` - Order confirmation delay before the cart
//!   is cleared (default: 2000)
//! - `ALTHAWQA_SUBMIT_DELAY_MS` - Latency of simulated form submissions (default: 1500)
//! - `ALTHAWQA_SUBMIT_FAILURE_RATE` - Probability in `[0, 1]` that a simulated
//!   submission fails (default: 0.1)
//! - `ALTHAWQA_CURRENCY` - Display currency code (default: SAR)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use althawqa_core::CurrencyCode;
use thiserror::Error;

use crate::models::session::keys;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// File backing the local key-value store
    pub storage_path: PathBuf,
    /// Cart persistence settings
    pub cart: CartSettings,
    /// Simulated network submission settings
    pub submission: SubmissionSettings,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Settings for the cart store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSettings {
    /// Storage slot the serialized cart is written to
    pub storage_key: String,
    /// Delay between checkout and the cart being cleared
    pub checkout_delay: Duration,
    /// Currency used when formatting prices
    pub currency: CurrencyCode,
}

impl Default for CartSettings {
    fn default() -> Self {
        Self {
            storage_key: keys::CART.to_string(),
            checkout_delay: Duration::from_millis(2000),
            currency: CurrencyCode::default(),
        }
    }
}

/// Settings for simulated form submissions.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionSettings {
    /// How long a submission takes
    pub delay: Duration,
    /// Probability that a submission fails
    pub failure_rate: f64,
}

impl Default for SubmissionSettings {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(1500),
            failure_rate: 0.1,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let storage_path = PathBuf::from(
            lookup("ALTHAWQA_STORAGE_PATH").unwrap_or_else(|| "althawqa-storage.json".to_string()),
        );

        let defaults = CartSettings::default();
        let cart = CartSettings {
            storage_key: lookup("ALTHAWQA_CART_KEY").unwrap_or(defaults.storage_key),
            checkout_delay: parse_millis(&lookup, "ALTHAWQA_CHECKOUT_DELAY_MS")?
                .unwrap_or(defaults.checkout_delay),
            currency: match lookup("ALTHAWQA_CURRENCY") {
                Some(value) => value
                    .parse()
                    .map_err(|e| ConfigError::InvalidEnvVar("ALTHAWQA_CURRENCY".to_string(), e))?,
                None => defaults.currency,
            },
        };

        let defaults = SubmissionSettings::default();
        let submission = SubmissionSettings {
            delay: parse_millis(&lookup, "ALTHAWQA_SUBMIT_DELAY_MS")?.unwrap_or(defaults.delay),
            failure_rate: parse_failure_rate(&lookup)?.unwrap_or(defaults.failure_rate),
        };

        Ok(Self {
            storage_path,
            cart,
            submission,
            sentry_dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a millisecond duration variable.
fn parse_millis(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<Duration>, ConfigError> {
    lookup(key)
        .map(|value| {
            value
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
        .transpose()
}

/// Parse the submission failure probability, which must lie in `[0, 1]`.
fn parse_failure_rate(
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<Option<f64>, ConfigError> {
    const KEY: &str = "ALTHAWQA_SUBMIT_FAILURE_RATE";

    let Some(value) = lookup(KEY) else {
        return Ok(None);
    };
    let rate = value
        .parse::<f64>()
        .map_err(|e| ConfigError::InvalidEnvVar(KEY.to_string(), e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            KEY.to_string(),
            format!("must be between 0 and 1 (got {rate})"),
        ));
    }
    Ok(Some(rate))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.storage_path, PathBuf::from("althawqa-storage.json"));
        assert_eq!(config.cart, CartSettings::default());
        assert_eq!(config.cart.storage_key, "restaurantCart");
        assert_eq!(config.cart.checkout_delay, Duration::from_secs(2));
        assert_eq!(config.submission, SubmissionSettings::default());
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = StorefrontConfig::from_lookup(lookup(&[
            ("ALTHAWQA_STORAGE_PATH", "/tmp/store.json"),
            ("ALTHAWQA_CART_KEY", "cart"),
            ("ALTHAWQA_CHECKOUT_DELAY_MS", "0"),
            ("ALTHAWQA_SUBMIT_DELAY_MS", "25"),
            ("ALTHAWQA_SUBMIT_FAILURE_RATE", "0"),
            ("ALTHAWQA_CURRENCY", "usd"),
        ]))
        .unwrap();
        assert_eq!(config.storage_path, PathBuf::from("/tmp/store.json"));
        assert_eq!(config.cart.storage_key, "cart");
        assert_eq!(config.cart.checkout_delay, Duration::ZERO);
        assert_eq!(config.cart.currency, CurrencyCode::USD);
        assert_eq!(config.submission.delay, Duration::from_millis(25));
        assert!(config.submission.failure_rate.abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_delay() {
        let err =
            StorefrontConfig::from_lookup(lookup(&[("ALTHAWQA_CHECKOUT_DELAY_MS", "soon")]))
                .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "ALTHAWQA_CHECKOUT_DELAY_MS"));
    }

    #[test]
    fn test_failure_rate_out_of_range() {
        let result =
            StorefrontConfig::from_lookup(lookup(&[("ALTHAWQA_SUBMIT_FAILURE_RATE", "1.5")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_currency() {
        let result = StorefrontConfig::from_lookup(lookup(&[("ALTHAWQA_CURRENCY", "XYZ")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_sentry_dsn_is_none() {
        let config = StorefrontConfig::from_lookup(lookup(&[("SENTRY_DSN", "")])).unwrap();
        assert!(config.sentry_dsn.is_none());
    }
}
