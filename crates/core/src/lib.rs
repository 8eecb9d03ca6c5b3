//! Al-Thawqa Core - Shared types library.
//!
//! This crate provides common types used across all Al-Thawqa components:
//! - `storefront` - Cart store, form services and storage backends
//! - `cli` - Command-line front end for the storefront services
//!
//! # Architecture
//!
//! The core crate contains only types and pure operations - no I/O, no
//! storage access, no timers. This keeps it lightweight and allows it to be
//! used anywhere, including from a browser build.
//!
//! # Modules
//!
//! - [`types`] - Cart and line items, prices, emails, phones, menu items and
//!   notification severities

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
