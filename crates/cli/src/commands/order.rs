//! Order fulfillment command.
//!
//! Writes the new status to the ledger first, then patches the mirror so
//! editors and the public order lookup see the same state. A mirror patch
//! failure leaves the ledger updated and reports the error; re-running the
//! command converges the mirror.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use velour_core::{OrderId, OrderStatus};
use velour_storefront::config::ContentConfig;
use velour_storefront::content::{ContentClient, ContentError, StatusUpdate};
use velour_storefront::db::{OrderRepository, RepositoryError};

/// Arguments for `order set-status`.
pub struct SetStatusArgs {
    pub id: i32,
    pub status: String,
    pub tracking: Option<String>,
    pub shipped_at: Option<String>,
    pub delivered_at: Option<String>,
    pub notes: Option<String>,
}

/// Errors from the order command.
#[derive(Debug, thiserror::Error)]
pub enum OrderCommandError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Invalid timestamp {0:?} (expected RFC 3339)")]
    InvalidTimestamp(String),

    #[error("Configuration error: {0}")]
    Config(#[from] velour_storefront::config::ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Content platform error: {0}")]
    Content(#[from] ContentError),
}

/// Set an order's status in the ledger and the mirror.
///
/// # Errors
///
/// Returns `OrderCommandError` if arguments are invalid, the order does not
/// exist, or either write fails.
pub async fn set_status(args: SetStatusArgs) -> Result<(), OrderCommandError> {
    dotenvy::dotenv().ok();

    let status: OrderStatus = args
        .status
        .parse()
        .map_err(|_| OrderCommandError::InvalidStatus(args.status.clone()))?;

    let shipped_at = resolve_timestamp(args.shipped_at, status == OrderStatus::Shipped)?;
    let delivered_at = resolve_timestamp(args.delivered_at, status == OrderStatus::Delivered)?;

    let database_url = std::env::var("STOREFRONT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| OrderCommandError::MissingEnvVar("STOREFRONT_DATABASE_URL"))?;
    let pool = PgPool::connect(&database_url).await?;

    let order_id = OrderId::new(args.id);

    // Ledger first: it is the system of record
    OrderRepository::new(&pool)
        .set_status(order_id, status.as_str())
        .await?;
    tracing::info!(%order_id, %status, "Ledger status updated");

    // Then the mirror
    let content = ContentClient::new(&ContentConfig::from_env()?);
    content
        .update_order_status(
            order_id,
            status,
            &StatusUpdate {
                tracking_number: args.tracking,
                shipped_at,
                delivered_at,
                notes: args.notes,
            },
        )
        .await?;
    tracing::info!(%order_id, %status, "Mirror status updated");

    Ok(())
}

/// Parse an RFC 3339 timestamp, defaulting to now when the status implies
/// the event just happened.
fn resolve_timestamp(
    raw: Option<String>,
    default_to_now: bool,
) -> Result<Option<DateTime<Utc>>, OrderCommandError> {
    match raw {
        Some(s) => DateTime::parse_from_rfc3339(&s)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|_| OrderCommandError::InvalidTimestamp(s)),
        None if default_to_now => Ok(Some(Utc::now())),
        None => Ok(None),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_timestamp_parses_rfc3339() {
        let ts = resolve_timestamp(Some("2025-03-01T12:00:00Z".to_string()), false)
            .unwrap()
            .unwrap();
        assert_eq!(ts.to_rfc3339(), "2025-03-01T12:00:00+00:00");
    }

    #[test]
    fn test_resolve_timestamp_rejects_garbage() {
        assert!(matches!(
            resolve_timestamp(Some("yesterday".to_string()), false),
            Err(OrderCommandError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_resolve_timestamp_defaults_when_asked() {
        assert!(resolve_timestamp(None, true).unwrap().is_some());
        assert!(resolve_timestamp(None, false).unwrap().is_none());
    }
}
