//! Public order lookup facade.
//!
//! Reads the mirror, not the ledger: the payload is exactly what editors
//! see in the content platform, fulfillment fields included.

use axum::{Json, extract::Query, extract::State};
use serde::Deserialize;

use velour_core::Email;

use crate::content::MirrorOrder;
use crate::error::{AppError, Result};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
    email: Option<String>,
}

/// `GET /api/orders?email=` - Mirror orders for one customer, newest first.
///
/// Missing or invalid email is a `400`; a mirror read failure is a plain
/// `500`, there is no ledger fallback on this endpoint.
pub async fn by_email(
    State(state): State<AppState>,
    Query(query): Query<OrdersQuery>,
) -> Result<Json<Vec<MirrorOrder>>> {
    let raw = query
        .email
        .ok_or_else(|| AppError::BadRequest("Email is required".to_string()))?;
    let email =
        Email::parse(&raw).map_err(|e| AppError::BadRequest(format!("invalid email: {e}")))?;

    let orders = state.content().orders_by_email(&email).await.map_err(|e| {
        sentry::capture_error(&e);
        tracing::error!(error = %e, "Mirror order lookup failed");
        AppError::Internal("Failed to fetch orders".to_string())
    })?;

    Ok(Json(orders))
}
