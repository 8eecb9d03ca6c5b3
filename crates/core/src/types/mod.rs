//! Core types for Al-Thawqa.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod email;
pub mod menu;
pub mod phone;
pub mod price;
pub mod status;

pub use cart::{AddOutcome, Cart, CartSummary, LineItem, QuantityChange, SummaryLine};
pub use email::{Email, EmailError};
pub use menu::{MenuFilter, MenuItem, MenuSelection};
pub use phone::{Phone, PhoneError};
pub use price::{CurrencyCode, Price};
pub use status::*;
