//! Session-related types.
//!
//! Types written to local storage after a successful login.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use althawqa_core::{AccountKind, Email};

/// Stored user identity.
///
/// Minimal data kept in storage to identify the logged-in user. Credentials
/// are never written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    /// Display name of the account.
    pub name: String,
    /// User's email address.
    pub email: Email,
    /// Portal the user logged in through.
    #[serde(rename = "type")]
    pub kind: AccountKind,
    /// When the login succeeded.
    pub login_time: DateTime<Utc>,
}

/// Storage keys for client-side state.
pub mod keys {
    /// Key for the serialized cart.
    pub const CART: &str = "restaurantCart";

    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "currentUser";

    /// Key holding `"true"` while a user is logged in.
    pub const IS_LOGGED_IN: &str = "isLoggedIn";

    /// Key for the account kind of the logged-in user.
    pub const USER_TYPE: &str = "userType";
}
