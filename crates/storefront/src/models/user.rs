//! User model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use velour_core::{Email, UserId};

/// A registered storefront user.
///
/// The password hash lives in the same table but is only surfaced through
/// the repository's dedicated credential lookup, never on this struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
