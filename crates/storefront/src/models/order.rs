//! Order ledger models.
//!
//! Line items are snapshots of the product at purchase time, not live
//! references, so later catalog edits never corrupt historical orders.
//! The JSON field names match the documents the content platform mirror
//! stores, which keeps the serialized ledger and mirror shapes comparable.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use velour_core::{OrderId, UserId};

/// A single purchased line, snapshotted at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItem {
    /// Content platform product document id.
    pub product_id: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
}

impl OrderLineItem {
    /// Line total (price × quantity).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Shipping details captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl ShippingInfo {
    /// Full customer name as shown on the mirror document.
    #[must_use]
    pub fn customer_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Single-line shipping address for the mirror and email templates.
    #[must_use]
    pub fn formatted_address(&self) -> String {
        format!(
            "{}, {}, {} {}",
            self.address, self.city, self.state, self.zip_code
        )
    }
}

/// An order as recorded in the ledger (the authoritative store).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub total: Decimal,
    pub status: String,
    pub shipping_info: ShippingInfo,
    pub items: Vec<OrderLineItem>,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
