//! Content platform client.
//!
//! The catalog and the order mirror live in a hosted headless content
//! platform, queried with GROQ over HTTP and written through its mutation
//! endpoint. Catalog reads are cached using `moka` (5-minute TTL); order
//! reads and all writes always hit the platform.

mod cache;
pub mod orders;
pub mod products;
pub mod queries;
pub mod types;

pub use types::{Gender, MirrorOrder, MirrorOrderItem, Product, StatusUpdate};

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::config::ContentConfig;
use cache::CacheValue;

/// Errors from the content platform.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// Transport-level failure (DNS, TLS, connection).
    #[error("content request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The platform answered with a non-success status.
    #[error("content API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The platform asked us to back off.
    #[error("content API rate limited, retry after {0}s")]
    RateLimited(u64),

    /// The response body could not be decoded.
    #[error("failed to parse content response: {0}")]
    Parse(#[from] serde_json::Error),

    /// A document the operation requires does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

/// Envelope around every query response.
#[derive(Debug, Deserialize)]
struct QueryResponse<T> {
    result: T,
}

/// Response to a mutation batch.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutateResponse {
    pub transaction_id: String,
    #[serde(default)]
    pub results: Vec<MutateResult>,
}

/// One affected document in a mutation response.
#[derive(Debug, Clone, Deserialize)]
pub struct MutateResult {
    pub id: String,
    #[serde(default)]
    pub operation: Option<String>,
}

/// Client for the content platform's HTTP API.
///
/// Cheaply cloneable; constructed once at startup and passed in explicitly
/// via application state.
#[derive(Clone)]
pub struct ContentClient {
    inner: Arc<ContentClientInner>,
}

struct ContentClientInner {
    client: reqwest::Client,
    query_endpoint: String,
    mutate_endpoint: String,
    api_token: String,
    cache: Cache<String, CacheValue>,
}

impl ContentClient {
    /// Create a new content platform client.
    #[must_use]
    pub fn new(config: &ContentConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        let base = format!(
            "https://{}.api.sanity.io/v{}/data",
            config.project_id, config.api_version
        );

        Self {
            inner: Arc::new(ContentClientInner {
                client: reqwest::Client::new(),
                query_endpoint: format!("{base}/query/{}", config.dataset),
                mutate_endpoint: format!("{base}/mutate/{}", config.dataset),
                api_token: config.api_token.expose_secret().to_string(),
                cache,
            }),
        }
    }

    /// Execute a GROQ query.
    ///
    /// `params` are passed as `$name` query parameters with JSON-encoded
    /// values, exactly as the platform expects.
    pub(crate) async fn query<T: DeserializeOwned>(
        &self,
        groq: &str,
        params: &[(&str, serde_json::Value)],
    ) -> Result<T, ContentError> {
        let mut url = format!(
            "{}?query={}",
            self.inner.query_endpoint,
            urlencoding::encode(groq)
        );
        for (name, value) in params {
            let encoded = serde_json::to_string(value)?;
            url.push_str(&format!(
                "&{}={}",
                urlencoding::encode(&format!("${name}")),
                urlencoding::encode(&encoded)
            ));
        }

        let response = self
            .inner
            .client
            .get(&url)
            .bearer_auth(&self.inner.api_token)
            .send()
            .await?;

        let body = Self::check_response(response).await?;
        let envelope: QueryResponse<T> = serde_json::from_str(&body)?;
        Ok(envelope.result)
    }

    /// Submit a batch of mutations.
    pub(crate) async fn mutate(
        &self,
        mutations: Vec<serde_json::Value>,
    ) -> Result<MutateResponse, ContentError> {
        let response = self
            .inner
            .client
            .post(format!("{}?returnIds=true", self.inner.mutate_endpoint))
            .bearer_auth(&self.inner.api_token)
            .json(&serde_json::json!({ "mutations": mutations }))
            .send()
            .await?;

        let body = Self::check_response(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Upsert a batch of documents with `createIfNotExists`.
    ///
    /// Used by seeding tooling; documents that already exist are untouched.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` if the mutation cannot be submitted.
    pub async fn upsert_documents(
        &self,
        documents: Vec<serde_json::Value>,
    ) -> Result<MutateResponse, ContentError> {
        let mutations = documents
            .into_iter()
            .map(|doc| serde_json::json!({ "createIfNotExists": doc }))
            .collect();

        self.mutate(mutations).await
    }

    /// Map transport status codes to errors and return the body text.
    async fn check_response(response: reqwest::Response) -> Result<String, ContentError> {
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ContentError::RateLimited(retry_after));
        }

        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Content API returned non-success status"
            );
            return Err(ContentError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        Ok(body)
    }

    /// Look up a cached value by key.
    async fn cached(&self, key: &str) -> Option<CacheValue> {
        self.inner.cache.get(key).await
    }

    /// Store a value in the cache.
    async fn store(&self, key: String, value: CacheValue) {
        self.inner.cache.insert(key, value).await;
    }
}
