//! Checkout route handler.

use axum::{Json, extract::State, http::StatusCode};
use rust_decimal::Decimal;
use serde::Serialize;
use tower_sessions::Session;

use velour_core::OrderId;

use crate::cart::Cart;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireAuth;
use crate::services::checkout::{CheckoutRequest, CheckoutService};
use crate::state::AppState;

/// Response to a successfully placed order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub order_id: OrderId,
    pub total: Decimal,
    pub status: String,
}

/// `POST /api/checkout` - Place an order from the current cart.
///
/// Succeeds once the order is durably in the ledger; mirror replication and
/// emails are driven afterwards and never surface here. The cart is cleared
/// only after the order exists.
pub async fn place_order(
    RequireAuth(user): RequireAuth,
    session: Session,
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<CheckoutResponse>)> {
    let mut cart = Cart::load(&session).await?;
    if cart.is_empty() {
        return Err(AppError::BadRequest("cart is empty".to_string()));
    }

    add_breadcrumb(
        "checkout",
        "Checkout started",
        Some(&[("unit_count", &cart.unit_count().to_string())]),
    );

    let service = CheckoutService::new(state.pool(), state.content(), state.email());
    let order = service
        .place_order(user.id, &user.email, cart.to_line_items(), &request)
        .await?;

    // The order is durable; a failed session write must not turn this
    // response into an error and invite a duplicate submission
    cart.clear();
    if let Err(e) = cart.save(&session).await {
        tracing::warn!(order_id = %order.id, error = %e, "Failed to clear cart after checkout");
    }

    Ok((
        StatusCode::CREATED,
        Json(CheckoutResponse {
            order_id: order.id,
            total: order.total,
            status: order.status,
        }),
    ))
}
