//! Typed views of content platform documents.
//!
//! Field names follow the camelCase convention of the document store; GROQ
//! projections in [`super::queries`] rename platform-internal fields
//! (`_id`, `_createdAt`, `slug.current`) to match these structs.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use velour_core::{OrderId, OrderStatus};

/// Product gender category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Men,
    Women,
}

impl Gender {
    /// The string form used in documents and URLs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Men => "men",
            Self::Women => "women",
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = UnknownGender;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "men" => Ok(Self::Men),
            "women" => Ok(Self::Women),
            other => Err(UnknownGender(other.to_owned())),
        }
    }
}

/// Error returned for an unrecognized gender segment.
#[derive(thiserror::Error, Debug, Clone)]
#[error("unknown gender: {0}")]
pub struct UnknownGender(String);

/// A catalog product, owned and edited exclusively by the content platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Content platform document id.
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub name: String,
    /// Unique human-readable key, used in product URLs.
    pub slug: String,
    pub gender: Gender,
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    /// Dereferenced image asset URL, when an image is set.
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub bestseller: bool,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
}

const fn default_in_stock() -> bool {
    true
}

/// A denormalized line on a mirror order document (no live product reference).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MirrorOrderItem {
    pub product_name: String,
    pub quantity: u32,
    pub price: Decimal,
}

/// The merchant-facing mirror of a ledger order.
///
/// Keyed by the ledger's order id stored as a plain field; carries the
/// merchant-editable fulfillment fields that never exist in the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MirrorOrder {
    pub order_id: OrderId,
    pub customer_name: String,
    pub customer_email: String,
    pub status: OrderStatus,
    pub total: Decimal,
    pub payment_method: String,
    pub shipping_address: String,
    #[serde(default)]
    pub items: Vec<MirrorOrderItem>,
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub order_date: DateTime<Utc>,
    #[serde(default)]
    pub shipped_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub delivered_date: Option<DateTime<Utc>>,
}

/// Optional fulfillment fields for a mirror status update.
///
/// Only fields that are `Some` are written; everything else on the document
/// is left untouched.
#[derive(Debug, Clone, Default)]
pub struct StatusUpdate {
    pub tracking_number: Option<String>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}
