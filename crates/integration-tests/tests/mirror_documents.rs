//! Integration tests for mirror document building and decoding.
//!
//! The same JSON shape must survive the full loop: ledger order -> mirror
//! document -> content platform -> `MirrorOrder` read back by the public
//! order lookup.

use chrono::Utc;
use rust_decimal::Decimal;

use velour_core::{Email, OrderId, OrderStatus, UserId};
use velour_storefront::content::MirrorOrder;
use velour_storefront::content::orders::{build_mirror_document, mirror_document_id};
use velour_storefront::models::{Order, OrderLineItem, ShippingInfo};

fn sample_order(id: i32) -> Order {
    Order {
        id: OrderId::new(id),
        user_id: UserId::new(7),
        total: Decimal::new(34800, 2),
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
                product_id: "product-oud-royale".to_string(),
                name: "Oud Royale".to_string(),
                price: Decimal::new(18900, 2),
                quantity: 1,
            },
            OrderLineItem {
                product_id: "product-rose-de-minuit".to_string(),
                name: "Rose de Minuit".to_string(),
                price: Decimal::new(15900, 2),
                quantity: 1,
            },
        ],
        payment_method: "cash_on_delivery".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

// =============================================================================
// Document Building
// =============================================================================

#[test]
fn test_document_id_derives_from_ledger_id() {
    assert_eq!(mirror_document_id(OrderId::new(42)), "order-42");
}

#[test]
fn test_rebuilding_a_document_changes_nothing() {
    // The background worker may rebuild and re-push a document that checkout
    // already synced; both attempts must produce the same bytes.
    let order = sample_order(42);
    let email = Email::parse("jane@doe.com").expect("valid email");

    let first = build_mirror_document(&order, &email);
    let second = build_mirror_document(&order, &email);
    assert_eq!(first, second);
}

#[test]
fn test_document_carries_customer_and_fulfillment_fields() {
    let order = sample_order(42);
    let email = Email::parse("jane@doe.com").expect("valid email");
    let doc = build_mirror_document(&order, &email);

    assert_eq!(doc["_id"], "order-42");
    assert_eq!(doc["orderId"], 42);
    assert_eq!(doc["customerName"], "Jane Doe");
    assert_eq!(doc["customerEmail"], "jane@doe.com");
    assert_eq!(doc["customerPhone"], "+1 555 0100");
    assert_eq!(doc["paymentMethod"], "cash_on_delivery");
    assert_eq!(doc["status"], "pending");
    assert_eq!(doc["shippingAddress"], "1 Rosewood Lane, Portland, OR 97201");
    assert_eq!(doc["items"].as_array().map(Vec::len), Some(2));
}

// =============================================================================
// Reading Documents Back
// =============================================================================

#[test]
fn test_platform_payload_decodes_into_mirror_order() {
    // Numbers come back from the platform as JSON numbers, not strings.
    let payload = serde_json::json!({
        "orderId": 42,
        "customerName": "Jane Doe",
        "customerEmail": "jane@doe.com",
        "status": "shipped",
        "total": 348.00,
        "paymentMethod": "cash_on_delivery",
        "shippingAddress": "1 Rosewood Lane, Portland, OR 97201",
        "items": [
            { "productName": "Oud Royale", "quantity": 1, "price": 189.00 }
        ],
        "orderDate": "2025-03-01T12:00:00Z",
        "trackingNumber": "1Z999AA10123456784",
        "shippedDate": "2025-03-02T09:30:00Z"
    });

    let order: MirrorOrder = serde_json::from_value(payload).expect("payload decodes");

    assert_eq!(order.order_id, OrderId::new(42));
    assert_eq!(order.status, OrderStatus::Shipped);
    assert_eq!(order.total, Decimal::new(34800, 2));
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.tracking_number.as_deref(), Some("1Z999AA10123456784"));
    assert!(order.delivered_date.is_none());
}

#[test]
fn test_mirror_order_tolerates_missing_optional_fields() {
    // Documents created before fulfillment have no tracking or dates.
    let payload = serde_json::json!({
        "orderId": 7,
        "customerName": "Jane Doe",
        "customerEmail": "jane@doe.com",
        "status": "pending",
        "total": 109.00,
        "paymentMethod": "cash_on_delivery",
        "shippingAddress": "1 Rosewood Lane, Portland, OR 97201",
        "orderDate": "2025-03-01T12:00:00Z"
    });

    let order: MirrorOrder = serde_json::from_value(payload).expect("payload decodes");

    assert!(order.items.is_empty());
    assert!(order.tracking_number.is_none());
    assert!(order.shipped_date.is_none());
    assert!(order.delivered_date.is_none());
    assert!(order.notes.is_none());
}

#[test]
fn test_built_document_round_trips_through_mirror_order() {
    let order = sample_order(9);
    let email = Email::parse("jane@doe.com").expect("valid email");
    let doc = build_mirror_document(&order, &email);

    let read_back: MirrorOrder = serde_json::from_value(doc).expect("document decodes");
    assert_eq!(read_back.order_id, order.id);
    assert_eq!(read_back.total, order.total);
    assert_eq!(read_back.status, OrderStatus::Pending);
    assert_eq!(read_back.items.len(), order.items.len());
}
