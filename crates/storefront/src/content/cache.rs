//! Cache value types for catalog reads.

use super::types::Product;

/// Values stored in the catalog cache.
///
/// A single enum keeps one `moka` cache for both list and single-product
/// lookups; keys are namespaced strings (`products:all`, `product:slug:x`).
#[derive(Debug, Clone)]
pub enum CacheValue {
    ProductList(Vec<Product>),
    Product(Option<Product>),
}

impl CacheValue {
    /// Extract a product list, if this entry holds one.
    pub fn into_product_list(self) -> Option<Vec<Product>> {
        match self {
            Self::ProductList(products) => Some(products),
            Self::Product(_) => None,
        }
    }

    /// Extract a single-product lookup result, if this entry holds one.
    pub fn into_product(self) -> Option<Option<Product>> {
        match self {
            Self::Product(product) => Some(product),
            Self::ProductList(_) => None,
        }
    }
}
