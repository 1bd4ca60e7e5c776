//! Shopper cart state.
//!
//! The cart is a pure state container persisted in the session under a fixed
//! key, so it survives reloads for as long as the session cookie lives. It
//! makes no network calls; mutation is last-write-wins, which is acceptable
//! for a single shopper clicking around one tab.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::content::Product;
use crate::models::{OrderLineItem, session_keys};

/// One product in the cart with its quantity.
///
/// The product is a snapshot taken when the item was added; prices shown in
/// the cart are the prices the shopper saw.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

/// The shopper's cart.
///
/// Invariant: at most one entry per product id, every quantity >= 1.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Add one unit of a product: increments the quantity if the product is
    /// already present, otherwise inserts a new entry with quantity 1.
    pub fn add(&mut self, product: Product) {
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            item.quantity += 1;
        } else {
            self.items.push(CartItem {
                product,
                quantity: 1,
            });
        }
    }

    /// Remove a product entirely. No-op if the product is not in the cart.
    pub fn remove(&mut self, product_id: &str) {
        self.items.retain(|i| i.product.id != product_id);
    }

    /// Overwrite a product's quantity. A quantity of zero or less removes
    /// the entry instead of leaving a zero-quantity line.
    pub fn set_quantity(&mut self, product_id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove(product_id);
            return;
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // quantity > 0 checked above
        let quantity = quantity.min(i64::from(u32::MAX)) as u32;
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product_id) {
            item.quantity = quantity;
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Derived total: Σ price × quantity, recomputed on every read.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .map(|i| i.product.price * Decimal::from(i.quantity))
            .sum()
    }

    /// Current entries.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Total unit count across all entries.
    #[must_use]
    pub fn unit_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Snapshot the cart as order line items for checkout.
    #[must_use]
    pub fn to_line_items(&self) -> Vec<OrderLineItem> {
        self.items
            .iter()
            .map(|i| OrderLineItem {
                product_id: i.product.id.clone(),
                name: i.product.name.clone(),
                price: i.product.price,
                quantity: i.quantity,
            })
            .collect()
    }

    /// Load the cart from the session; absent or unreadable state yields an
    /// empty cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store is unreachable.
    pub async fn load(session: &Session) -> Result<Self, tower_sessions::session::Error> {
        Ok(session
            .get::<Self>(session_keys::CART)
            .await?
            .unwrap_or_default())
    }

    /// Persist the cart back to the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store is unreachable.
    pub async fn save(&self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        session.insert(session_keys::CART, self).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::content::types::Gender;

    fn product(id: &str, price: i64) -> Product {
        Product {
            id: id.to_string(),
            created_at: Utc::now(),
            name: format!("Fragrance {id}"),
            slug: format!("fragrance-{id}"),
            gender: Gender::Women,
            price: Decimal::new(price, 0),
            description: String::new(),
            image_url: None,
            bestseller: false,
            category: None,
            in_stock: true,
        }
    }

    #[test]
    fn test_add_new_product_inserts_with_quantity_one() {
        let mut cart = Cart::default();
        cart.add(product("a", 100));

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 1);
    }

    #[test]
    fn test_add_existing_product_increments_quantity() {
        let mut cart = Cart::default();
        cart.add(product("a", 100));
        cart.add(product("a", 100));
        cart.add(product("a", 100));

        // Never a second entry for the same product id
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 3);
    }

    #[test]
    fn test_no_duplicate_entries_across_mixed_operations() {
        let mut cart = Cart::default();
        cart.add(product("a", 100));
        cart.add(product("b", 50));
        cart.add(product("a", 100));
        cart.set_quantity("b", 4);
        cart.add(product("b", 50));

        let mut ids: Vec<&str> = cart.items().iter().map(|i| i.product.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), cart.items().len());
    }

    #[test]
    fn test_remove_deletes_entry_and_is_noop_when_absent() {
        let mut cart = Cart::default();
        cart.add(product("a", 100));
        cart.remove("a");
        assert!(cart.is_empty());

        // Removing again is a no-op
        cart.remove("a");
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_overwrites() {
        let mut cart = Cart::default();
        cart.add(product("a", 100));
        cart.set_quantity("a", 5);
        assert_eq!(cart.items()[0].quantity, 5);
    }

    #[test]
    fn test_set_quantity_zero_equals_remove() {
        let mut cart = Cart::default();
        cart.add(product("a", 100));
        cart.set_quantity("a", 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_negative_equals_remove() {
        let mut cart = Cart::default();
        cart.add(product("a", 100));
        cart.set_quantity("a", -3);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clear_empties_all_entries() {
        let mut cart = Cart::default();
        cart.add(product("a", 100));
        cart.add(product("b", 50));
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[test]
    fn test_total_is_sum_of_price_times_quantity() {
        let mut cart = Cart::default();
        cart.add(product("a", 100));
        cart.set_quantity("a", 2);
        cart.add(product("b", 50));

        assert_eq!(cart.total(), Decimal::new(250, 0));
    }

    #[test]
    fn test_total_tracks_every_mutation() {
        let mut cart = Cart::default();
        cart.add(product("a", 100));
        cart.add(product("b", 50));
        cart.add(product("a", 100));
        cart.set_quantity("b", 3);
        cart.remove("a");

        let expected: Decimal = cart
            .items()
            .iter()
            .map(|i| i.product.price * Decimal::from(i.quantity))
            .sum();
        assert_eq!(cart.total(), expected);
        assert_eq!(cart.total(), Decimal::new(150, 0));
    }

    #[test]
    fn test_to_line_items_snapshots_cart() {
        let mut cart = Cart::default();
        cart.add(product("a", 100));
        cart.set_quantity("a", 2);

        let lines = cart.to_line_items();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].product_id, "a");
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[0].price, Decimal::new(100, 0));
    }
}
