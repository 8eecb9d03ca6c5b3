//! Presentation-ready views handed to the UI layer.

pub mod cart;

pub use cart::{CartItemView, CartView};
