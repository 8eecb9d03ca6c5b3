//! Cart commands.
//!
//! Every command opens the cart from the configured storage file, which
//! prints it once, then applies one action.
//!
//! # Usage
//!
//! ```bash
//! althawqa cart list
//! althawqa cart add "Chicken Kabsa"
//! althawqa cart add "Chef's Special" --price 120
//! althawqa cart inc 0
//! althawqa cart dec 0
//! althawqa cart remove 1
//! althawqa cart checkout
//! ```

use std::path::Path;
use std::sync::Arc;

use althawqa_storefront::config::StorefrontConfig;
use althawqa_storefront::services::{CartStore, CheckoutOutcome};

use super::{CommandError, menu, open_storage};
use crate::terminal::{TerminalNotifier, TerminalRenderer};

/// Open the persisted cart with terminal output.
pub fn open(config: &StorefrontConfig) -> CartStore {
    CartStore::open(
        config.cart.clone(),
        open_storage(config),
        Arc::new(TerminalRenderer),
        Arc::new(TerminalNotifier),
    )
}

/// Print the cart.
pub fn list(config: &StorefrontConfig) {
    open(config);
}

/// Add one unit of a dish.
///
/// With `price` the dish is added as given; otherwise it is looked up in
/// the menu catalog.
///
/// # Errors
///
/// Returns an error if the dish is unknown or the cart cannot be saved.
pub fn add(
    config: &StorefrontConfig,
    name: &str,
    price: Option<u64>,
    menu_file: Option<&Path>,
) -> Result<(), CommandError> {
    let store = open(config);

    if let Some(price) = price {
        store.add_item(name, price, "", "")?;
    } else {
        let catalog = menu::load_catalog(menu_file)?;
        let item = menu::find_item(&catalog, name)?;
        store.add_item(&item.name, item.price, &item.description, &item.image)?;
    }

    Ok(())
}

/// Change the quantity of the row at `index` by `delta`.
///
/// # Errors
///
/// Returns an error if the cart cannot be saved.
pub fn adjust(config: &StorefrontConfig, index: usize, delta: i64) -> Result<(), CommandError> {
    let store = open(config);
    if store.update_quantity(index, delta)?.is_none() {
        tracing::warn!(index, "No cart row at index");
    }
    Ok(())
}

/// Remove the row at `index`.
///
/// # Errors
///
/// Returns an error if the cart cannot be saved.
pub fn remove(config: &StorefrontConfig, index: usize) -> Result<(), CommandError> {
    let store = open(config);
    if store.remove_item(index)?.is_none() {
        tracing::warn!(index, "No cart row at index");
    }
    Ok(())
}

/// Check out and wait for the order confirmation.
///
/// # Errors
///
/// Returns an error if the cleared cart cannot be saved.
pub async fn checkout(config: &StorefrontConfig) -> Result<(), CommandError> {
    let store = open(config);
    match store.checkout()? {
        CheckoutOutcome::EmptyCart => Err(CommandError::NotSubmitted("nothing to check out")),
        CheckoutOutcome::Scheduled(pending) => {
            pending.confirmed().await?;
            Ok(())
        }
    }
}
