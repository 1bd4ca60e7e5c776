//! Catalog route handlers.
//!
//! Listing endpoints degrade to an empty list when the content platform is
//! unreachable: a shopper browsing during a platform outage sees an empty
//! shelf, not an error page.

use std::str::FromStr;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::content::{ContentError, Gender, Product};
use crate::error::{AppError, Result};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    gender: Option<String>,
}

/// `GET /api/products` - All products, optionally filtered by gender.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Result<Json<Vec<Product>>> {
    let result = match query.gender.as_deref() {
        Some(raw) => {
            let gender = Gender::from_str(raw)
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            state.content().products_by_gender(gender).await
        }
        None => state.content().all_products().await,
    };

    Ok(Json(degrade_to_empty(result)?))
}

/// `GET /api/products/bestsellers` - Bestseller-flagged products.
pub async fn bestsellers(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let result = state.content().bestselling_products().await;
    Ok(Json(degrade_to_empty(result)?))
}

/// `GET /api/products/{slug}` - Single product detail.
///
/// A platform outage reads as absence here, matching the listings'
/// degraded behavior.
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Product>> {
    let product = degrade_to_missing(state.content().product_by_slug(&slug).await)?
        .ok_or_else(|| AppError::NotFound(format!("product {slug}")))?;

    Ok(Json(product))
}

/// Swallow platform outages on listing endpoints, keeping rate limiting
/// visible to the client.
fn degrade_to_empty(
    result: std::result::Result<Vec<Product>, ContentError>,
) -> Result<Vec<Product>> {
    match result {
        Ok(products) => Ok(products),
        Err(e @ ContentError::RateLimited(_)) => Err(e.into()),
        Err(e) => {
            sentry::capture_error(&e);
            tracing::error!(error = %e, "Catalog read failed, serving empty list");
            Ok(Vec::new())
        }
    }
}

/// Same policy for the single-product lookup.
fn degrade_to_missing(
    result: std::result::Result<Option<Product>, ContentError>,
) -> Result<Option<Product>> {
    match result {
        Ok(product) => Ok(product),
        Err(e @ ContentError::RateLimited(_)) => Err(e.into()),
        Err(e) => {
            sentry::capture_error(&e);
            tracing::error!(error = %e, "Product detail read failed, serving not found");
            Ok(None)
        }
    }
}
