//! Terminal presentation of cart views and notifications.

use althawqa_core::{Notification, Severity};
use althawqa_storefront::services::{CartRenderer, Notifier, TracingNotifier};
use althawqa_storefront::views::CartView;

/// Prints the cart as a table on stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalRenderer;

impl CartRenderer for TerminalRenderer {
    #[allow(clippy::print_stdout)]
    fn render(&self, view: &CartView) {
        if view.is_empty() {
            println!("Your cart is empty");
            return;
        }

        println!("Cart ({} items)", view.item_count);
        for item in &view.items {
            println!(
                "  [{}] {:<24} {:>16}  {:>12}",
                item.index, item.name, item.price_line, item.line_price
            );
        }
        println!("  Total: {}", view.total);
    }
}

/// Logs every notification and echoes it to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    #[allow(clippy::print_stdout)]
    fn notify(&self, notification: Notification) {
        let marker = match notification.severity {
            Severity::Info => "i",
            Severity::Success => "✓",
            Severity::Error => "✗",
        };
        println!("{marker} {}", notification.message);
        TracingNotifier.notify(notification);
    }
}
