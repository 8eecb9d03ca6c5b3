//! Al-Thawqa storefront library.
//!
//! Client-side state and behavior of the restaurant site: the persistent
//! cart, the contact, reservation and login forms, and the storage they
//! share. Presentation is left to the host through the renderer and
//! notifier seams in [`services::notify`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;
pub mod telemetry;
pub mod views;
