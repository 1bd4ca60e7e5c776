//! Integration tests for the cart-to-order pipeline.
//!
//! These tests drive the cart and checkout computation end to end without a
//! database: totals, line-item snapshots, and the retry schedule that
//! governs mirror replication.

use chrono::Utc;
use rust_decimal::Decimal;

use velour_storefront::cart::Cart;
use velour_storefront::content::{Gender, Product};
use velour_storefront::db::outbox::{MAX_SYNC_ATTEMPTS, backoff_delay_secs};
use velour_storefront::services::checkout::recompute_total;

fn product(id: &str, slug: &str, price: Decimal) -> Product {
    Product {
        id: id.to_string(),
        created_at: Utc::now(),
        name: format!("Fragrance {id}"),
        slug: slug.to_string(),
        gender: Gender::Women,
        price,
        description: String::new(),
        image_url: None,
        bestseller: false,
        category: None,
        in_stock: true,
    }
}

// =============================================================================
// Cart-to-Order Totals
// =============================================================================

#[test]
fn test_order_total_matches_cart_total() {
    let mut cart = Cart::default();
    cart.add(product("a", "oud-royale", Decimal::new(18900, 2)));
    cart.add(product("a", "oud-royale", Decimal::new(18900, 2)));
    cart.add(product("b", "rose-de-minuit", Decimal::new(15900, 2)));

    let items = cart.to_line_items();
    assert_eq!(recompute_total(&items), cart.total());
    assert_eq!(recompute_total(&items), Decimal::new(53700, 2));
}

#[test]
fn test_line_items_freeze_cart_prices() {
    let mut cart = Cart::default();
    cart.add(product("a", "oud-royale", Decimal::new(18900, 2)));
    cart.set_quantity("a", 3);

    let items = cart.to_line_items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].price, Decimal::new(18900, 2));
    assert_eq!(items[0].quantity, 3);
    assert_eq!(items[0].line_total(), Decimal::new(56700, 2));
}

#[test]
fn test_server_total_ignores_any_client_figure() {
    // Whatever total a client submits, the persisted figure comes from
    // Σ price × quantity over the snapshot.
    let mut cart = Cart::default();
    cart.add(product("a", "oud-royale", Decimal::new(100, 0)));
    cart.set_quantity("a", 2);
    cart.add(product("b", "rose-de-minuit", Decimal::new(50, 0)));

    let server_total = recompute_total(&cart.to_line_items());
    assert_eq!(server_total, Decimal::new(250, 0));

    let bogus_client_total = Decimal::ONE;
    assert_ne!(server_total, bogus_client_total);
}

#[test]
fn test_emptying_cart_yields_zero_total() {
    let mut cart = Cart::default();
    cart.add(product("a", "oud-royale", Decimal::new(100, 0)));
    cart.clear();

    assert!(cart.is_empty());
    assert_eq!(recompute_total(&cart.to_line_items()), Decimal::ZERO);
}

// =============================================================================
// Replication Retry Schedule
// =============================================================================

#[test]
fn test_retry_schedule_is_monotonic_until_cap() {
    let delays: Vec<u64> = (0..MAX_SYNC_ATTEMPTS).map(backoff_delay_secs).collect();

    for window in delays.windows(2) {
        assert!(window[1] >= window[0], "delays must never shrink");
    }
    assert_eq!(delays[0], 30);
}

#[test]
fn test_retry_schedule_never_exceeds_an_hour() {
    for attempt in 0..100 {
        assert!(backoff_delay_secs(attempt) <= 3600);
    }
}
