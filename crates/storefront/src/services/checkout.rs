//! Checkout orchestration.
//!
//! Turns a cart into a ledger order. The order and its replication task
//! commit in one transaction; everything after that commit (mirror sync,
//! emails) is best-effort and can never undo the order. The order total is
//! always recomputed server-side from the line items; a client-declared
//! total is advisory only.

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;

use velour_core::{Email, UserId};

use crate::content::ContentClient;
use crate::db::outbox::MAX_SYNC_ATTEMPTS;
use crate::db::{OrderRepository, OutboxRepository, RepositoryError, orders::NewOrder};
use crate::error::AppError;
use crate::models::{Order, OrderLineItem, ShippingInfo};
use crate::services::notifications::EmailService;

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart had no items.
    #[error("cart is empty")]
    EmptyCart,

    /// Ledger write failed; nothing was persisted.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::EmptyCart => Self::BadRequest("cart is empty".to_string()),
            CheckoutError::Repository(e) => Self::Database(e),
        }
    }
}

/// Client-submitted checkout payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub shipping_info: ShippingInfo,
    pub payment_method: String,
    /// Total as the client computed it; compared against the server figure
    /// and logged on disagreement, never trusted.
    #[serde(default)]
    pub total: Option<Decimal>,
}

/// Checkout orchestrator.
pub struct CheckoutService<'a> {
    orders: OrderRepository<'a>,
    outbox: OutboxRepository<'a>,
    content: &'a ContentClient,
    email: Option<&'a EmailService>,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(
        pool: &'a PgPool,
        content: &'a ContentClient,
        email: Option<&'a EmailService>,
    ) -> Self {
        Self {
            orders: OrderRepository::new(pool),
            outbox: OutboxRepository::new(pool),
            content,
            email,
        }
    }

    /// Place an order from the given cart items.
    ///
    /// On return the order is durably in the ledger with a queued
    /// replication task. One inline mirror attempt and the notification
    /// emails happen before returning, but their failures are only logged.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if there are no items.
    /// Returns `CheckoutError::Repository` if the ledger write fails.
    pub async fn place_order(
        &self,
        user_id: UserId,
        customer_email: &Email,
        items: Vec<OrderLineItem>,
        request: &CheckoutRequest,
    ) -> Result<Order, CheckoutError> {
        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let total = recompute_total(&items);
        if let Some(client_total) = request.total
            && client_total != total
        {
            tracing::warn!(
                %user_id,
                %client_total,
                server_total = %total,
                "Client-declared total disagrees with server computation"
            );
        }

        let order = self
            .orders
            .create_with_outbox(NewOrder {
                user_id,
                total,
                shipping_info: &request.shipping_info,
                items: &items,
                payment_method: &request.payment_method,
            })
            .await?;

        tracing::info!(order_id = %order.id, %user_id, %total, "Order placed");

        self.try_inline_sync(&order, customer_email).await;
        self.send_emails(&order, customer_email).await;

        Ok(order)
    }

    /// First mirror replication attempt, inline so the mirror is usually
    /// fresh by the time the customer looks at their order history. Losing
    /// the claim or failing here just leaves the task for the worker.
    async fn try_inline_sync(&self, order: &Order, customer_email: &Email) {
        let task = match self.outbox.claim_for_order(order.id).await {
            Ok(Some(task)) => task,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!(order_id = %order.id, error = %e, "Inline sync claim failed");
                return;
            }
        };

        match self.content.sync_order(order, customer_email).await {
            Ok(_) => {
                if let Err(e) = self.outbox.mark_done(task.id).await {
                    tracing::warn!(order_id = %order.id, error = %e, "Failed to mark sync task done");
                }
            }
            Err(e) => {
                tracing::warn!(order_id = %order.id, error = %e, "Inline mirror sync failed, leaving task for worker");
                if let Err(e) = self
                    .outbox
                    .record_failure(task.id, task.attempts, &e.to_string(), MAX_SYNC_ATTEMPTS)
                    .await
                {
                    tracing::warn!(order_id = %order.id, error = %e, "Failed to record sync failure");
                }
            }
        }
    }

    /// Merchant and customer notifications, single attempt each.
    async fn send_emails(&self, order: &Order, customer_email: &Email) {
        let Some(email) = self.email else {
            tracing::debug!(order_id = %order.id, "Email not configured, skipping notifications");
            return;
        };

        if let Err(e) = email.send_order_emails(order, customer_email.as_str()).await {
            sentry::capture_error(&e);
            tracing::error!(order_id = %order.id, error = %e, "Order notification emails failed");
        }
    }
}

/// Server-side order total: Σ price × quantity over the line items.
#[must_use]
pub fn recompute_total(items: &[OrderLineItem]) -> Decimal {
    items.iter().map(OrderLineItem::line_total).sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(product_id: &str, price: i64, quantity: u32) -> OrderLineItem {
        OrderLineItem {
            product_id: product_id.to_string(),
            name: format!("Fragrance {product_id}"),
            price: Decimal::new(price, 0),
            quantity,
        }
    }

    #[test]
    fn test_recompute_total_sums_lines() {
        let items = vec![line("a", 100, 2), line("b", 50, 1)];
        assert_eq!(recompute_total(&items), Decimal::new(250, 0));
    }

    #[test]
    fn test_recompute_total_empty_is_zero() {
        assert_eq!(recompute_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_client_total_is_never_used() {
        // The payload can carry any total; the persisted figure comes from
        // the line items alone.
        let items = vec![line("a", 100, 2), line("b", 50, 1)];
        let declared = Decimal::new(1, 0);

        let persisted = recompute_total(&items);
        assert_ne!(persisted, declared);
        assert_eq!(persisted, Decimal::new(250, 0));
    }
}
