//! Catalog reads.
//!
//! All product data is owned by the content platform's editorial interface;
//! the storefront never mutates it. Results are cached for five minutes.

use super::cache::CacheValue;
use super::types::{Gender, Product};
use super::{ContentClient, ContentError, queries};

impl ContentClient {
    /// All products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` if the platform is unreachable or the
    /// response cannot be decoded.
    pub async fn all_products(&self) -> Result<Vec<Product>, ContentError> {
        self.product_list("products:all", &queries::all_products(), &[])
            .await
    }

    /// Products in one gender category, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` on transport or decode failure.
    pub async fn products_by_gender(&self, gender: Gender) -> Result<Vec<Product>, ContentError> {
        self.product_list(
            &format!("products:gender:{}", gender.as_str()),
            &queries::products_by_gender(),
            &[("gender", serde_json::json!(gender.as_str()))],
        )
        .await
    }

    /// Bestseller-flagged products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` on transport or decode failure.
    pub async fn bestselling_products(&self) -> Result<Vec<Product>, ContentError> {
        self.product_list(
            "products:bestsellers",
            &queries::bestselling_products(),
            &[],
        )
        .await
    }

    /// A single product by slug, or `None` if no such product exists.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` on transport or decode failure.
    pub async fn product_by_slug(&self, slug: &str) -> Result<Option<Product>, ContentError> {
        let key = format!("product:slug:{slug}");
        if let Some(product) = self.cached(&key).await.and_then(CacheValue::into_product) {
            return Ok(product);
        }

        let product: Option<Product> = self
            .query(
                &queries::product_by_slug(),
                &[("slug", serde_json::json!(slug))],
            )
            .await?;

        self.store(key, CacheValue::Product(product.clone())).await;
        Ok(product)
    }

    /// Cached product-list query.
    async fn product_list(
        &self,
        cache_key: &str,
        groq: &str,
        params: &[(&str, serde_json::Value)],
    ) -> Result<Vec<Product>, ContentError> {
        if let Some(products) = self
            .cached(cache_key)
            .await
            .and_then(CacheValue::into_product_list)
        {
            return Ok(products);
        }

        let products: Vec<Product> = self.query(groq, params).await?;
        self.store(
            cache_key.to_string(),
            CacheValue::ProductList(products.clone()),
        )
        .await;
        Ok(products)
    }
}
