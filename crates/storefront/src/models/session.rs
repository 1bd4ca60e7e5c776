//! Session-scoped models and keys.

use serde::{Deserialize, Serialize};

use velour_core::{Email, UserId};

/// Keys under which values are stored in the session.
pub mod session_keys {
    /// The authenticated user, set on login/registration.
    pub const CURRENT_USER: &str = "current_user";
    /// The shopper's cart; fixed namespace so it survives reloads.
    pub const CART: &str = "cart";
}

/// The authenticated user carried in the session cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: Email,
    pub name: String,
}

impl CurrentUser {
    /// Build the session view of a freshly loaded user row.
    #[must_use]
    pub fn from_user(user: &crate::models::User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}
