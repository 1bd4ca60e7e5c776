//! Background mirror replication worker.
//!
//! Drains the outbox: claims due tasks, rebuilds the mirror document from
//! the ledger row and pushes it to the content platform. Safe to run in
//! multiple processes; `FOR UPDATE SKIP LOCKED` claiming keeps workers off
//! each other's tasks, and the deterministic mirror document id makes a
//! duplicate push harmless.

use std::time::Duration;

use sqlx::PgPool;

use crate::content::{ContentClient, ContentError};
use crate::db::outbox::{MAX_SYNC_ATTEMPTS, SyncTask};
use crate::db::{OrderRepository, OutboxRepository, RepositoryError, UserRepository};

/// How often the worker polls for due tasks.
const POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Tasks claimed per polling cycle.
const BATCH_SIZE: i64 = 10;

/// Background worker that replicates ledger orders into the mirror.
pub struct OrderSyncWorker {
    pool: PgPool,
    content: ContentClient,
}

impl OrderSyncWorker {
    /// Create a new sync worker.
    #[must_use]
    pub const fn new(pool: PgPool, content: ContentClient) -> Self {
        Self { pool, content }
    }

    /// Run the worker until the process exits.
    ///
    /// Intended to be spawned as a background task next to the HTTP server.
    pub async fn run(self) {
        let mut interval = tokio::time::interval(POLL_INTERVAL);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            if let Err(e) = self.process_pending().await {
                sentry::capture_error(&e);
                tracing::error!(error = %e, "Outbox polling cycle failed");
            }
        }
    }

    /// One polling cycle: claim due tasks and process each.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the claim query itself fails; individual
    /// task failures are recorded on the task and do not abort the cycle.
    pub async fn process_pending(&self) -> Result<usize, RepositoryError> {
        let outbox = OutboxRepository::new(&self.pool);
        let tasks = outbox.claim_due(BATCH_SIZE).await?;
        let claimed = tasks.len();

        if claimed > 0 {
            tracing::info!(count = claimed, "Claimed mirror sync tasks");
        }

        for task in tasks {
            if let Err(e) = self.process_task(&task).await {
                if task.attempts + 1 >= MAX_SYNC_ATTEMPTS {
                    tracing::error!(
                        order_id = %task.order_id,
                        attempts = task.attempts + 1,
                        error = %e,
                        "Mirror sync exhausted retries, task parked"
                    );
                } else {
                    tracing::warn!(
                        order_id = %task.order_id,
                        attempts = task.attempts,
                        error = %e,
                        "Mirror sync attempt failed"
                    );
                }
                outbox
                    .record_failure(task.id, task.attempts, &e.to_string(), MAX_SYNC_ATTEMPTS)
                    .await?;
            } else {
                outbox.mark_done(task.id).await?;
            }
        }

        Ok(claimed)
    }

    /// Replicate one order into the mirror.
    async fn process_task(&self, task: &SyncTask) -> Result<(), SyncError> {
        let order = OrderRepository::new(&self.pool)
            .get_by_id(task.order_id)
            .await?
            .ok_or(SyncError::OrderMissing)?;

        let user = UserRepository::new(&self.pool)
            .get_by_id(order.user_id)
            .await?
            .ok_or(SyncError::UserMissing)?;

        self.content.sync_order(&order, &user.email).await?;
        Ok(())
    }
}

/// Errors from one replication attempt.
#[derive(Debug, thiserror::Error)]
enum SyncError {
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("content error: {0}")]
    Content(#[from] ContentError),

    /// Outbox row survived its order; should be impossible with the FK.
    #[error("order row missing for outbox task")]
    OrderMissing,

    #[error("user row missing for order")]
    UserMissing,
}
