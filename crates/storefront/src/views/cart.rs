//! Cart display data.
//!
//! The UI layer never reads the cart itself. After every mutation the cart
//! store builds a [`CartView`] from a fresh summary and hands it to the
//! renderer: badge count, rows with their action index, formatted total.

use althawqa_core::{CartSummary, CurrencyCode, Price, SummaryLine};
use serde::Serialize;

/// Cart item display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItemView {
    /// Row position, bound to the +/-/remove buttons.
    pub index: usize,
    pub name: String,
    pub quantity: u32,
    /// Formatted unit price, e.g. `"40 SAR"`.
    pub price: String,
    /// Unit price times quantity as shown under the name, e.g. `"40 SAR × 2"`.
    pub price_line: String,
    /// Formatted line subtotal.
    pub line_price: String,
}

/// Cart display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    /// Formatted grand total.
    pub total: String,
    /// Badge count (sum of quantities).
    pub item_count: u64,
}

impl CartView {
    /// Build the view from a freshly computed summary.
    #[must_use]
    pub fn from_summary(summary: &CartSummary, currency: CurrencyCode) -> Self {
        Self {
            items: summary
                .lines
                .iter()
                .map(|line| CartItemView::from_line(line, currency))
                .collect(),
            total: Price::new(summary.total, currency).display(),
            item_count: summary.item_count,
        }
    }

    /// Whether the UI should show the empty-cart placeholder instead of rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl CartItemView {
    fn from_line(line: &SummaryLine, currency: CurrencyCode) -> Self {
        let price = Price::new(line.unit_price, currency).display();
        Self {
            index: line.index,
            name: line.name.clone(),
            quantity: line.quantity,
            price_line: format!("{price} × {}", line.quantity),
            price,
            line_price: Price::new(line.subtotal, currency).display(),
        }
    }
}
