//! Asynchronous submission of validated forms.
//!
//! The site has no backend. Contact messages and reservations go through a
//! [`Submitter`]: production wiring uses [`SimulatedSubmitter`], which waits
//! and occasionally fails the way a flaky network would; tests inject a
//! deterministic fake.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use thiserror::Error;

use crate::config::SubmissionSettings;
use crate::services::validation::FieldErrors;

/// Errors returned by a [`Submitter`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The remote side could not be reached.
    #[error("failed to reach the server")]
    Unreachable,
}

/// Sends a payload somewhere and echoes back what was accepted.
pub trait Submitter<T>: Send + Sync {
    fn submit(&self, payload: T) -> impl Future<Output = Result<T, SubmitError>> + Send;
}

/// Result of validating and submitting a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome<T> {
    /// Validation failed; nothing was sent.
    Invalid(FieldErrors),
    /// The submitter returned an error.
    Failed(SubmitError),
    /// The submitter accepted the payload.
    Submitted(T),
}

impl<T> FormOutcome<T> {
    /// Whether the payload was accepted.
    #[must_use]
    pub const fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted(_))
    }
}

/// Mock network call: waits `delay`, then fails with probability
/// `failure_rate` or echoes the payload.
#[derive(Debug, Clone)]
pub struct SimulatedSubmitter {
    delay: Duration,
    failure_rate: f64,
}

impl SimulatedSubmitter {
    /// Build from configuration. `failure_rate` is clamped to `[0, 1]`.
    #[must_use]
    pub fn new(settings: &SubmissionSettings) -> Self {
        Self {
            delay: settings.delay,
            failure_rate: settings.failure_rate.clamp(0.0, 1.0),
        }
    }
}

impl<T: Send> Submitter<T> for SimulatedSubmitter {
    fn submit(&self, payload: T) -> impl Future<Output = Result<T, SubmitError>> + Send {
        let delay = self.delay;
        let fails = rand::rng().random_bool(self.failure_rate);

        async move {
            tokio::time::sleep(delay).await;
            if fails {
                tracing::warn!(delay_ms = delay.as_millis(), "Simulated submission failed");
                Err(SubmitError::Unreachable)
            } else {
                tracing::debug!(delay_ms = delay.as_millis(), "Simulated submission accepted");
                Ok(payload)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn settings(failure_rate: f64) -> SubmissionSettings {
        SubmissionSettings {
            delay: Duration::from_millis(1500),
            failure_rate,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_failing_echoes_payload() {
        let submitter = SimulatedSubmitter::new(&settings(0.0));
        for _ in 0..20 {
            assert_eq!(submitter.submit("hello").await.unwrap(), "hello");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_failing_errors() {
        let submitter = SimulatedSubmitter::new(&settings(1.0));
        assert_eq!(submitter.submit(42).await, Err(SubmitError::Unreachable));
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_for_delay() {
        let submitter = SimulatedSubmitter::new(&settings(0.0));
        let start = tokio::time::Instant::now();
        submitter.submit(()).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(1500));
    }

    #[test]
    fn test_failure_rate_is_clamped() {
        let submitter = SimulatedSubmitter::new(&settings(7.0));
        assert!((submitter.failure_rate - 1.0).abs() < f64::EPSILON);
    }
}
