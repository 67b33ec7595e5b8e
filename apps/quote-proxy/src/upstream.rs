//! Upstream quote API client.
//!
//! Thin client for the brapi.dev-style quote API: three GET-based
//! query shapes, a bounded timeout, and no retries. A single failed
//! attempt is surfaced to the caller immediately; responses are
//! buffered whole before parsing.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::error::UpstreamError;

/// Default history range token when the caller supplies none.
pub const DEFAULT_HISTORY_RANGE: &str = "1mo";

/// Port for fetching quote payloads from upstream.
///
/// The proxy never interprets quote fields beyond the presence of the
/// top-level `results` list, so every operation yields an opaque JSON
/// value (the first element of `results`).
#[async_trait]
pub trait QuoteFetcher: Send + Sync {
    /// Fetch the current quote for a ticker.
    async fn fetch_quote(&self, ticker: &str) -> Result<Value, UpstreamError>;

    /// Fetch the current quote plus fundamental indicators and
    /// dividend history.
    async fn fetch_quote_detailed(&self, ticker: &str) -> Result<Value, UpstreamError>;

    /// Fetch time-series data over a caller-supplied range token.
    ///
    /// The token is passed through unvalidated; upstream's own
    /// rejection of a bad token surfaces as an upstream status error.
    async fn fetch_history(&self, ticker: &str, range: &str) -> Result<Value, UpstreamError>;
}

/// HTTP client for the upstream quote API.
#[derive(Debug, Clone)]
pub struct BrapiClient {
    client: Client,
    base_url: String,
}

impl BrapiClient {
    /// Create a new client against `base_url` with a per-request
    /// timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Issue a single GET and extract the first element of `results`.
    async fn first_result(
        &self,
        ticker: &str,
        path_and_query: &str,
    ) -> Result<Value, UpstreamError> {
        let url = format!("{}{}", self.base_url, path_and_query);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%ticker, status = status.as_u16(), "Upstream returned error status");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        let body: Value = serde_json::from_str(&text)
            .map_err(|e| UpstreamError::MalformedResponse(e.to_string()))?;

        match body.get("results").and_then(Value::as_array) {
            Some(results) if !results.is_empty() => Ok(results[0].clone()),
            _ => Err(UpstreamError::TickerNotFound {
                ticker: ticker.to_string(),
            }),
        }
    }
}

#[async_trait]
impl QuoteFetcher for BrapiClient {
    async fn fetch_quote(&self, ticker: &str) -> Result<Value, UpstreamError> {
        self.first_result(ticker, &format!("/quote/{ticker}")).await
    }

    async fn fetch_quote_detailed(&self, ticker: &str) -> Result<Value, UpstreamError> {
        self.first_result(
            ticker,
            &format!("/quote/{ticker}?fundamental=true&dividends=true"),
        )
        .await
    }

    async fn fetch_history(&self, ticker: &str, range: &str) -> Result<Value, UpstreamError> {
        self.first_result(ticker, &format!("/quote/{ticker}?range={range}&interval=1d"))
            .await
    }
}
