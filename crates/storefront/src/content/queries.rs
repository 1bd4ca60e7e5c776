//! GROQ queries against the content platform.
//!
//! Projections rename platform-internal fields to the camelCase names the
//! types in [`super::types`] deserialize, and dereference image assets to a
//! plain URL so no follow-up asset lookup is needed.

/// Projection shared by every product query.
pub const PRODUCT_PROJECTION: &str = r#"{
  "id": _id,
  "createdAt": _createdAt,
  name,
  "slug": slug.current,
  gender,
  price,
  description,
  "imageUrl": image.asset->url,
  bestseller,
  category,
  inStock
}"#;

/// All products, newest first.
#[must_use]
pub fn all_products() -> String {
    format!("*[_type == \"product\"] | order(_createdAt desc) {PRODUCT_PROJECTION}")
}

/// Products for one gender category, newest first. Takes `$gender`.
#[must_use]
pub fn products_by_gender() -> String {
    format!(
        "*[_type == \"product\" && gender == $gender] | order(_createdAt desc) {PRODUCT_PROJECTION}"
    )
}

/// Bestseller-flagged products, newest first.
#[must_use]
pub fn bestselling_products() -> String {
    format!(
        "*[_type == \"product\" && bestseller == true] | order(_createdAt desc) {PRODUCT_PROJECTION}"
    )
}

/// A single product by slug, or null. Takes `$slug`.
#[must_use]
pub fn product_by_slug() -> String {
    format!("*[_type == \"product\" && slug.current == $slug][0] {PRODUCT_PROJECTION}")
}

/// All mirror orders for one customer email, newest order first. Takes `$email`.
#[must_use]
pub fn orders_by_email() -> String {
    r#"*[_type == "order" && customerEmail == $email] | order(orderDate desc) {
  orderId,
  customerName,
  customerEmail,
  status,
  total,
  paymentMethod,
  shippingAddress,
  "items": items[]{ productName, quantity, price },
  trackingNumber,
  notes,
  orderDate,
  shippedDate,
  deliveredDate
}"#
    .to_string()
}

/// The document id of the mirror for one ledger order, or null. Takes `$orderId`.
#[must_use]
pub fn order_document_id() -> String {
    "*[_type == \"order\" && orderId == $orderId][0]._id".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_queries_filter_by_type() {
        for query in [
            all_products(),
            products_by_gender(),
            bestselling_products(),
            product_by_slug(),
        ] {
            assert!(query.contains("_type == \"product\""));
            assert!(query.contains("\"slug\": slug.current"));
        }
    }

    #[test]
    fn test_catalog_lists_sort_newest_first() {
        assert!(all_products().contains("order(_createdAt desc)"));
        assert!(products_by_gender().contains("order(_createdAt desc)"));
        assert!(bestselling_products().contains("order(_createdAt desc)"));
    }

    #[test]
    fn test_product_by_slug_selects_single_document() {
        assert!(product_by_slug().contains("[0]"));
    }

    #[test]
    fn test_orders_by_email_matches_exactly_and_sorts_desc() {
        let query = orders_by_email();
        assert!(query.contains("customerEmail == $email"));
        assert!(query.contains("order(orderDate desc)"));
        // Items are denormalized snapshots, never product references
        assert!(query.contains("productName, quantity, price"));
    }

    #[test]
    fn test_order_document_id_keys_on_ledger_id() {
        let query = order_document_id();
        assert!(query.contains("orderId == $orderId"));
        assert!(query.ends_with("._id"));
    }
}
