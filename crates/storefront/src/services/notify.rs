//! Seams to the presentation layer.
//!
//! Services never draw anything. They hand a [`CartView`] to a
//! [`CartRenderer`] and a [`Notification`] to a [`Notifier`]; the host
//! decides how those look. Plain closures implement both traits.

use althawqa_core::Notification;

use crate::views::CartView;

/// Receives user-facing messages (toasts, alerts).
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

impl<F> Notifier for F
where
    F: Fn(Notification) + Send + Sync,
{
    fn notify(&self, notification: Notification) {
        self(notification);
    }
}

/// Receives a fresh cart view after every cart change.
pub trait CartRenderer: Send + Sync {
    fn render(&self, view: &CartView);
}

impl<F> CartRenderer for F
where
    F: Fn(&CartView) + Send + Sync,
{
    fn render(&self, view: &CartView) {
        self(view);
    }
}

/// A [`Notifier`] that writes messages to the tracing log.
///
/// Every severity is logged at `info`, so user-facing errors never reach
/// Sentry as events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        tracing::info!(severity = %notification.severity, "{}", notification.message);
    }
}
