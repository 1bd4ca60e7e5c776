//! Cart route handlers.
//!
//! Products are added by slug and resolved against the catalog server-side,
//! so the cart always carries platform prices rather than anything the
//! client submitted.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::cart::{Cart, CartItem};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Cart as returned to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    items: Vec<CartItem>,
    total: Decimal,
    unit_count: u32,
}

impl CartResponse {
    fn from_cart(cart: &Cart) -> Self {
        Self {
            items: cart.items().to_vec(),
            total: cart.total(),
            unit_count: cart.unit_count(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddRequest {
    slug: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    product_id: String,
    quantity: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveRequest {
    product_id: String,
}

/// `GET /api/cart` - Current cart contents.
pub async fn show(
    RequireAuth(_user): RequireAuth,
    session: Session,
) -> Result<Json<CartResponse>> {
    let cart = Cart::load(&session).await?;
    Ok(Json(CartResponse::from_cart(&cart)))
}

/// `POST /api/cart/add` - Add one unit of a product by slug.
pub async fn add(
    RequireAuth(_user): RequireAuth,
    session: Session,
    State(state): State<AppState>,
    Json(request): Json<AddRequest>,
) -> Result<Json<CartResponse>> {
    let product = state
        .content()
        .product_by_slug(&request.slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {}", request.slug)))?;

    add_breadcrumb("cart", "Added product to cart", Some(&[("slug", &request.slug)]));

    let mut cart = Cart::load(&session).await?;
    cart.add(product);
    cart.save(&session).await?;

    Ok(Json(CartResponse::from_cart(&cart)))
}

/// `POST /api/cart/update` - Overwrite a line quantity (zero removes).
pub async fn update(
    RequireAuth(_user): RequireAuth,
    session: Session,
    Json(request): Json<UpdateRequest>,
) -> Result<Json<CartResponse>> {
    let mut cart = Cart::load(&session).await?;
    cart.set_quantity(&request.product_id, request.quantity);
    cart.save(&session).await?;

    Ok(Json(CartResponse::from_cart(&cart)))
}

/// `POST /api/cart/remove` - Remove a line.
pub async fn remove(
    RequireAuth(_user): RequireAuth,
    session: Session,
    Json(request): Json<RemoveRequest>,
) -> Result<Json<CartResponse>> {
    let mut cart = Cart::load(&session).await?;
    cart.remove(&request.product_id);
    cart.save(&session).await?;

    Ok(Json(CartResponse::from_cart(&cart)))
}

/// `POST /api/cart/clear` - Empty the cart.
pub async fn clear(
    RequireAuth(_user): RequireAuth,
    session: Session,
) -> Result<Json<CartResponse>> {
    let mut cart = Cart::load(&session).await?;
    cart.clear();
    cart.save(&session).await?;

    Ok(Json(CartResponse::from_cart(&cart)))
}
