//! Domain models stored in the local key-value store.

pub mod session;

pub use session::CurrentUser;
