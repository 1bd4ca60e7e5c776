//! Outbox repository for mirror replication tasks.
//!
//! Each ledger order gets exactly one outbox row, written in the same
//! transaction as the order itself. Workers claim due rows with
//! `FOR UPDATE SKIP LOCKED` plus a short lease on `next_attempt_at`, so
//! concurrent workers never process the same order twice and a crashed
//! worker's claim simply expires.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use velour_core::OrderId;

use super::RepositoryError;

/// How long a claimed task is invisible to other workers.
const CLAIM_LEASE_SECS: f64 = 60.0;

/// Attempts before a task is parked as `failed`.
pub const MAX_SYNC_ATTEMPTS: i32 = 8;

/// Base delay for the first retry; doubles per attempt.
const BACKOFF_BASE_SECS: u64 = 30;

/// Ceiling on the retry delay.
const BACKOFF_MAX_SECS: u64 = 3600;

/// Doublings after which the delay already exceeds the ceiling.
const BACKOFF_SHIFT_CAP: u32 = 7;

/// Retry delay after `attempts` completed attempts, exponential with a cap.
#[must_use]
pub fn backoff_delay_secs(attempts: i32) -> u64 {
    // Clamp the shift before applying it: 30 << 7 is past the ceiling
    // already, and an unclamped shift would wrap for large attempt counts.
    let shift = u32::try_from(attempts).unwrap_or(0).min(BACKOFF_SHIFT_CAP);
    (BACKOFF_BASE_SECS << shift).min(BACKOFF_MAX_SECS)
}

/// One claimed replication task.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SyncTask {
    pub id: i64,
    pub order_id: OrderId,
    pub attempts: i32,
    pub next_attempt_at: DateTime<Utc>,
}

/// Repository for outbox operations.
pub struct OutboxRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OutboxRepository<'a> {
    /// Create a new outbox repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Claim up to `limit` due pending tasks.
    ///
    /// Claiming pushes `next_attempt_at` forward by a lease, which keeps the
    /// rows out of other workers' reach while this one processes them.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn claim_due(&self, limit: i64) -> Result<Vec<SyncTask>, RepositoryError> {
        let tasks = sqlx::query_as::<_, SyncTask>(
            r"
            UPDATE order_sync_outbox
            SET next_attempt_at = now() + make_interval(secs => $2)
            WHERE id IN (
                SELECT id
                FROM order_sync_outbox
                WHERE status = 'pending'
                  AND next_attempt_at <= now()
                ORDER BY next_attempt_at
                LIMIT $1
                FOR UPDATE SKIP LOCKED
            )
            RETURNING id, order_id, attempts, next_attempt_at
            ",
        )
        .bind(limit)
        .bind(CLAIM_LEASE_SECS)
        .fetch_all(self.pool)
        .await?;

        Ok(tasks)
    }

    /// Claim the task for one specific order, if it is still pending and due.
    ///
    /// Used by checkout for the inline first attempt; losing the claim to a
    /// background worker is fine and returns `None`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn claim_for_order(
        &self,
        order_id: OrderId,
    ) -> Result<Option<SyncTask>, RepositoryError> {
        let task = sqlx::query_as::<_, SyncTask>(
            r"
            UPDATE order_sync_outbox
            SET next_attempt_at = now() + make_interval(secs => $2)
            WHERE id IN (
                SELECT id
                FROM order_sync_outbox
                WHERE order_id = $1
                  AND status = 'pending'
                  AND next_attempt_at <= now()
                FOR UPDATE SKIP LOCKED
            )
            RETURNING id, order_id, attempts, next_attempt_at
            ",
        )
        .bind(order_id.as_i32())
        .bind(CLAIM_LEASE_SECS)
        .fetch_optional(self.pool)
        .await?;

        Ok(task)
    }

    /// Mark a task as successfully replicated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn mark_done(&self, task_id: i64) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            UPDATE order_sync_outbox
            SET status = 'done', last_error = NULL, updated_at = now()
            WHERE id = $1
            ",
        )
        .bind(task_id)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Record a failed attempt.
    ///
    /// Bumps the attempt counter and schedules the retry with exponential
    /// backoff; once `max_attempts` is reached the task is parked as
    /// `failed` for operator attention instead of retrying forever.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn record_failure(
        &self,
        task_id: i64,
        attempts_so_far: i32,
        error: &str,
        max_attempts: i32,
    ) -> Result<(), RepositoryError> {
        let attempts = attempts_so_far + 1;

        if attempts >= max_attempts {
            sqlx::query(
                r"
                UPDATE order_sync_outbox
                SET status = 'failed', attempts = $2, last_error = $3, updated_at = now()
                WHERE id = $1
                ",
            )
            .bind(task_id)
            .bind(attempts)
            .bind(error)
            .execute(self.pool)
            .await?;
            return Ok(());
        }

        #[allow(clippy::cast_precision_loss)] // delay is at most an hour
        let delay_secs = backoff_delay_secs(attempts) as f64;
        sqlx::query(
            r"
            UPDATE order_sync_outbox
            SET attempts = $2,
                last_error = $3,
                next_attempt_at = now() + make_interval(secs => $4),
                updated_at = now()
            WHERE id = $1
            ",
        )
        .bind(task_id)
        .bind(attempts)
        .bind(error)
        .bind(delay_secs)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}
