//! Cart and line item types.
//!
//! [`Cart`] is the ordered list of line items a visitor has picked from the
//! menu. It enforces two invariants on every operation:
//!
//! - names are unique (adding an existing name bumps its quantity)
//! - no line item with a quantity of zero is ever kept
//!
//! The serialized form is a bare JSON array of
//! `{name, price, description, image, quantity}` objects, which is what the
//! storefront writes to its key-value slot.

use serde::{Deserialize, Serialize};

/// One distinct product in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product name, unique within the cart.
    pub name: String,
    /// Unit price in whole currency units.
    #[serde(default)]
    pub price: u64,
    /// Display text captured when the item was first added.
    #[serde(default)]
    pub description: String,
    /// Image reference captured when the item was first added.
    #[serde(default)]
    pub image: String,
    /// Always at least 1 while the item is in a cart.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

impl LineItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> u64 {
        self.price.saturating_mul(u64::from(self.quantity))
    }
}

/// Result of [`Cart::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line was appended with quantity 1.
    Added,
    /// An existing line's quantity was bumped to the contained value.
    Incremented(u32),
}

/// Result of a successful [`Cart::update_quantity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantityChange {
    /// The quantity was changed in place to the contained value.
    Updated(u32),
    /// The quantity reached zero or below and the line was removed.
    Removed(LineItem),
}

/// Ordered collection of line items; insertion order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from arbitrary line items, restoring the invariants.
    ///
    /// Zero-quantity lines are dropped and repeated names are merged into the
    /// first occurrence (whose metadata wins).
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = LineItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            if item.quantity == 0 {
                continue;
            }
            match cart.items.iter_mut().find(|existing| existing.name == item.name) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(item.quantity);
                }
                None => cart.items.push(item),
            }
        }
        cart
    }

    /// Parse the persisted JSON array form.
    ///
    /// Elements that are not line items are skipped; see
    /// [`Cart::from_json_partial`].
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when the input is not a JSON array.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Self::from_json_partial(json).map(|(cart, _)| cart)
    }

    /// Parse the persisted JSON array form, element by element.
    ///
    /// Returns the cart and the number of elements that could not be read as
    /// a line item (for example one without a `name`). Those are dropped; the
    /// rest of the cart survives.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when the input is not a JSON array.
    pub fn from_json_partial(json: &str) -> Result<(Self, usize), serde_json::Error> {
        let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
        let total = values.len();
        let items: Vec<LineItem> = values
            .into_iter()
            .filter_map(|value| serde_json::from_value(value).ok())
            .collect();
        let skipped = total - items.len();
        Ok((Self::from_items(items), skipped))
    }

    /// Serialize to the persisted JSON array form.
    ///
    /// # Errors
    ///
    /// Serializing plain strings and integers does not fail in practice; the
    /// `serde_json` error is passed through rather than unwrapped.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.items)
    }

    /// Add one unit of a product.
    ///
    /// If a line with the same name exists its quantity is incremented and
    /// all other fields are left as first added.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        price: u64,
        description: impl Into<String>,
        image: impl Into<String>,
    ) -> AddOutcome {
        let name = name.into();
        if let Some(existing) = self.items.iter_mut().find(|item| item.name == name) {
            existing.quantity = existing.quantity.saturating_add(1);
            return AddOutcome::Incremented(existing.quantity);
        }

        self.items.push(LineItem {
            name,
            price,
            description: description.into(),
            image: image.into(),
            quantity: 1,
        });
        AddOutcome::Added
    }

    /// Remove the line at `index`, shifting later lines left.
    ///
    /// Returns `None` and leaves the cart untouched when `index` is out of
    /// range.
    pub fn remove(&mut self, index: usize) -> Option<LineItem> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Apply a signed quantity change to the line at `index`.
    ///
    /// A resulting quantity of zero or below removes the line. Returns `None`
    /// when `index` is out of range.
    pub fn update_quantity(&mut self, index: usize, delta: i64) -> Option<QuantityChange> {
        let item = self.items.get_mut(index)?;
        let next = i64::from(item.quantity).saturating_add(delta);

        if next <= 0 {
            return self.remove(index).map(QuantityChange::Removed);
        }

        item.quantity = u32::try_from(next).unwrap_or(u32::MAX);
        Some(QuantityChange::Updated(item.quantity))
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Lines in display order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Line at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&LineItem> {
        self.items.get(index)
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of `price * quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.items
            .iter()
            .fold(0_u64, |sum, item| sum.saturating_add(item.subtotal()))
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Derive a fresh summary from the current lines.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        CartSummary {
            item_count: self.item_count(),
            lines: self
                .items
                .iter()
                .enumerate()
                .map(|(index, item)| SummaryLine {
                    index,
                    name: item.name.clone(),
                    unit_price: item.price,
                    quantity: item.quantity,
                    subtotal: item.subtotal(),
                })
                .collect(),
            total: self.total(),
        }
    }
}

/// Recomputed view of a cart: counts, line subtotals and the grand total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    /// Sum of quantities.
    pub item_count: u64,
    /// One entry per line, in display order.
    pub lines: Vec<SummaryLine>,
    /// Sum of line subtotals.
    pub total: u64,
}

/// One row of a [`CartSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryLine {
    /// Position in the cart, used to bind row actions.
    pub index: usize,
    pub name: String,
    pub unit_price: u64,
    pub quantity: u32,
    pub subtotal: u64,
}
