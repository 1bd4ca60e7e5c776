//! Order ledger repository.
//!
//! The ledger is the system of record for purchases. Creating an order also
//! enqueues an outbox row in the same transaction, so every accepted order is
//! guaranteed a pending replication task even if the process dies immediately
//! after commit.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use velour_core::{OrderId, UserId};

use super::RepositoryError;
use crate::models::{Order, OrderLineItem, ShippingInfo};

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: i32,
    total: Decimal,
    status: String,
    shipping_info: Json<ShippingInfo>,
    items: Json<Vec<OrderLineItem>>,
    payment_method: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self) -> Order {
        Order {
            id: OrderId::new(self.id),
            user_id: UserId::new(self.user_id),
            total: self.total,
            status: self.status,
            shipping_info: self.shipping_info.0,
            items: self.items.0,
            payment_method: self.payment_method,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Everything needed to insert a new ledger order.
#[derive(Debug)]
pub struct NewOrder<'a> {
    pub user_id: UserId,
    pub total: Decimal,
    pub shipping_info: &'a ShippingInfo,
    pub items: &'a [OrderLineItem],
    pub payment_method: &'a str,
}

/// Repository for order ledger operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new order and its outbox row in one transaction.
    ///
    /// Both rows commit together or not at all: there is no window where an
    /// order exists without a queued replication task.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement or the commit
    /// fails (the order is not persisted in that case).
    pub async fn create_with_outbox(&self, new_order: NewOrder<'_>) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, OrderRow>(
            r"
            INSERT INTO orders (user_id, total, status, shipping_info, items, payment_method)
            VALUES ($1, $2, 'pending', $3, $4, $5)
            RETURNING id, user_id, total, status, shipping_info, items, payment_method,
                      created_at, updated_at
            ",
        )
        .bind(new_order.user_id.as_i32())
        .bind(new_order.total)
        .bind(Json(new_order.shipping_info))
        .bind(Json(new_order.items))
        .bind(new_order.payment_method)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r"
            INSERT INTO order_sync_outbox (order_id)
            VALUES ($1)
            ",
        )
        .bind(row.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into_order())
    }

    /// All orders placed by a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, user_id, total, status, shipping_info, items, payment_method,
                   created_at, updated_at
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(OrderRow::into_order).collect())
    }

    /// Get one order by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, user_id, total, status, shipping_info, items, payment_method,
                   created_at, updated_at
            FROM orders
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(OrderRow::into_order))
    }

    /// Set the ledger status of an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such order exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_status(&self, id: OrderId, status: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE orders
            SET status = $1, updated_at = now()
            WHERE id = $2
            ",
        )
        .bind(status)
        .bind(id.as_i32())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
