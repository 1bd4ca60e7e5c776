//! Order mirror operations.
//!
//! The mirror document id is derived from the ledger order id, so creation
//! goes through `createIfNotExists` and is an atomic upsert: retrying a sync
//! can never produce a second mirror for the same order.

use velour_core::{Email, OrderId, OrderStatus};

use super::types::StatusUpdate;
use super::{ContentClient, ContentError, MirrorOrder, queries};
use crate::models::Order;

/// Deterministic mirror document id for a ledger order.
#[must_use]
pub fn mirror_document_id(order_id: OrderId) -> String {
    format!("order-{order_id}")
}

/// Build the mirror document for a freshly created ledger order.
///
/// Items are denormalized to name/quantity/price snapshots; the document
/// never references live product documents.
#[must_use]
pub fn build_mirror_document(order: &Order, customer_email: &Email) -> serde_json::Value {
    let items: Vec<serde_json::Value> = order
        .items
        .iter()
        .map(|item| {
            serde_json::json!({
                "_type": "orderItem",
                "_key": format!("line-{}", item.product_id),
                "productName": item.name,
                "quantity": item.quantity,
                "price": item.price,
            })
        })
        .collect();

    serde_json::json!({
        "_id": mirror_document_id(order.id),
        "_type": "order",
        "orderId": order.id,
        "customerName": order.shipping_info.customer_name(),
        "customerEmail": customer_email.as_str(),
        "customerPhone": order.shipping_info.phone,
        "status": OrderStatus::Pending,
        "total": order.total,
        "paymentMethod": order.payment_method,
        "shippingAddress": order.shipping_info.formatted_address(),
        "items": items,
        "orderDate": order.created_at,
    })
}

impl ContentClient {
    /// Replicate a ledger order into the mirror.
    ///
    /// Idempotent: the deterministic document id plus `createIfNotExists`
    /// means a retried sync is a no-op returning the same document id.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` if the mutation cannot be submitted.
    pub async fn sync_order(
        &self,
        order: &Order,
        customer_email: &Email,
    ) -> Result<String, ContentError> {
        let document = build_mirror_document(order, customer_email);
        let document_id = mirror_document_id(order.id);

        self.mutate(vec![serde_json::json!({ "createIfNotExists": document })])
            .await?;

        tracing::info!(order_id = %order.id, document_id = %document_id, "Order mirrored to content platform");
        Ok(document_id)
    }

    /// Patch merchant-settable fulfillment fields on an existing mirror.
    ///
    /// Only the supplied fields are written; absent fields are untouched.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::NotFound` if no mirror exists for the order,
    /// or another `ContentError` if the lookup or patch fails.
    pub async fn update_order_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
        update: &StatusUpdate,
    ) -> Result<(), ContentError> {
        let document_id: Option<String> = self
            .query(
                &queries::order_document_id(),
                &[("orderId", serde_json::json!(order_id))],
            )
            .await?;

        let Some(document_id) = document_id else {
            return Err(ContentError::NotFound(format!(
                "no mirror document for order {order_id}"
            )));
        };

        let mut set = serde_json::Map::new();
        set.insert("status".to_string(), serde_json::json!(status));
        if let Some(tracking) = &update.tracking_number {
            set.insert("trackingNumber".to_string(), serde_json::json!(tracking));
        }
        if let Some(shipped) = &update.shipped_at {
            set.insert("shippedDate".to_string(), serde_json::json!(shipped));
        }
        if let Some(delivered) = &update.delivered_at {
            set.insert("deliveredDate".to_string(), serde_json::json!(delivered));
        }
        if let Some(notes) = &update.notes {
            set.insert("notes".to_string(), serde_json::json!(notes));
        }

        self.mutate(vec![serde_json::json!({
            "patch": { "id": document_id, "set": set }
        })])
        .await?;

        tracing::info!(order_id = %order_id, status = %status, "Mirror order status updated");
        Ok(())
    }

    /// All mirror orders for one customer email, newest order first.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` on transport or decode failure.
    pub async fn orders_by_email(&self, email: &Email) -> Result<Vec<MirrorOrder>, ContentError> {
        self.query(
            &queries::orders_by_email(),
            &[("email", serde_json::json!(email.as_str()))],
        )
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use velour_core::UserId;

    use super::*;
    use crate::models::{OrderLineItem, ShippingInfo};

    fn sample_order(id: i32) -> Order {
        Order {
            id: OrderId::new(id),
            user_id: UserId::new(1),
            total: Decimal::new(18999, 0),
            status: "pending".to_string(),
            shipping_info: ShippingInfo {
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                email: "jane@doe.com".to_string(),
                phone: "+1 555 0100".to_string(),
                address: "1 Rosewood Lane".to_string(),
                city: "Portland".to_string(),
                state: "OR".to_string(),
                zip_code: "97201".to_string(),
                country: "US".to_string(),
            },
            items: vec![
                OrderLineItem {
                    product_id: "product-a".to_string(),
                    name: "Oud Royale".to_string(),
                    price: Decimal::new(12999, 0),
                    quantity: 1,
                },
                OrderLineItem {
                    product_id: "product-b".to_string(),
                    name: "Amber Noir".to_string(),
                    price: Decimal::new(6000, 0),
                    quantity: 1,
                },
            ],
            payment_method: "cash_on_delivery".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_mirror_document_id_is_deterministic() {
        // Retried syncs key on the same id, making creation an upsert
        assert_eq!(mirror_document_id(OrderId::new(7)), "order-7");
        assert_eq!(
            mirror_document_id(OrderId::new(7)),
            mirror_document_id(OrderId::new(7))
        );
    }

    #[test]
    fn test_build_mirror_document_shape() {
        let order = sample_order(42);
        let email = Email::parse("jane@doe.com").unwrap();
        let doc = build_mirror_document(&order, &email);

        assert_eq!(doc["_id"], "order-42");
        assert_eq!(doc["_type"], "order");
        assert_eq!(doc["orderId"], 42);
        assert_eq!(doc["status"], "pending");
        assert_eq!(doc["customerName"], "Jane Doe");
        assert_eq!(doc["customerEmail"], "jane@doe.com");
        assert_eq!(doc["shippingAddress"], "1 Rosewood Lane, Portland, OR 97201");
    }

    #[test]
    fn test_build_mirror_document_denormalizes_items() {
        let order = sample_order(42);
        let email = Email::parse("jane@doe.com").unwrap();
        let doc = build_mirror_document(&order, &email);

        let items = doc["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        // Snapshot fields only; no live product reference
        assert_eq!(items[0]["productName"], "Oud Royale");
        assert_eq!(items[0]["quantity"], 1);
        assert!(items[0].get("productId").is_none());
        assert!(items[0].get("_ref").is_none());
    }

    #[test]
    fn test_identical_orders_build_identical_documents() {
        let order = sample_order(9);
        let email = Email::parse("jane@doe.com").unwrap();
        assert_eq!(
            build_mirror_document(&order, &email),
            build_mirror_document(&order, &email)
        );
    }
}
