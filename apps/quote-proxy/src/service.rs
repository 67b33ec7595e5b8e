//! Quote lookup orchestration.
//!
//! Sits between the HTTP boundary and the upstream client: normalizes
//! ticker symbols, derives cache keys, consults the cache, and falls
//! through to upstream on a miss. Single-ticker lookups are fail-fast;
//! the batch lookup isolates failures per ticker. That asymmetry is a
//! deliberate design property.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::cache::QuoteCache;
use crate::error::UpstreamError;
use crate::upstream::QuoteFetcher;

/// Where a returned payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Served from the in-memory cache.
    Cache,
    /// Freshly fetched from the upstream API.
    Upstream,
}

/// A successful single-ticker lookup.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteResponse {
    /// Provenance of the payload.
    pub source: Source,
    /// Opaque upstream payload.
    pub data: Value,
}

/// Per-ticker outcome in a batch lookup. Failures are recorded inline
/// instead of aborting sibling tickers.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum QuoteOutcome {
    /// Lookup succeeded (from cache or upstream).
    Success {
        /// Normalized ticker.
        ticker: String,
        /// Provenance of the payload.
        source: Source,
        /// Opaque upstream payload.
        data: Value,
    },
    /// Lookup failed; the message comes from the upstream error.
    Failure {
        /// Normalized ticker.
        ticker: String,
        /// Error message for this ticker.
        error: String,
    },
}

/// Normalize a raw ticker: trim surrounding whitespace, uppercase.
/// Idempotent by construction.
#[must_use]
pub fn normalize_ticker(raw: &str) -> String {
    raw.trim().to_uppercase()
}

fn quote_key(ticker: &str) -> String {
    format!("quote_{ticker}")
}

fn quote_full_key(ticker: &str) -> String {
    format!("quote_full_{ticker}")
}

fn history_key(ticker: &str, range: &str) -> String {
    format!("history_{ticker}_{range}")
}

/// Cache-then-upstream quote lookups.
///
/// Holds the process-wide cache (injected at startup) and the upstream
/// fetcher. Generic over the fetcher so tests can count upstream calls
/// with a fake.
#[derive(Debug)]
pub struct QuoteService<F> {
    cache: Arc<QuoteCache>,
    fetcher: F,
}

impl<F: QuoteFetcher> QuoteService<F> {
    /// Create a service over the given cache and fetcher.
    pub fn new(cache: Arc<QuoteCache>, fetcher: F) -> Self {
        Self { cache, fetcher }
    }

    /// Current quote for a ticker.
    pub async fn get_quote(&self, ticker: &str) -> Result<QuoteResponse, UpstreamError> {
        let ticker = normalize_ticker(ticker);
        let key = quote_key(&ticker);
        if let Some(data) = self.cache.get(&key) {
            tracing::debug!(%ticker, %key, "Cache hit");
            return Ok(QuoteResponse {
                source: Source::Cache,
                data,
            });
        }

        let data = self.fetcher.fetch_quote(&ticker).await?;
        self.cache.put(&key, data.clone());
        tracing::debug!(%ticker, %key, "Fetched from upstream");
        Ok(QuoteResponse {
            source: Source::Upstream,
            data,
        })
    }

    /// Detailed quote (fundamentals and dividends) for a ticker.
    pub async fn get_quote_full(&self, ticker: &str) -> Result<QuoteResponse, UpstreamError> {
        let ticker = normalize_ticker(ticker);
        let key = quote_full_key(&ticker);
        if let Some(data) = self.cache.get(&key) {
            tracing::debug!(%ticker, %key, "Cache hit");
            return Ok(QuoteResponse {
                source: Source::Cache,
                data,
            });
        }

        let data = self.fetcher.fetch_quote_detailed(&ticker).await?;
        self.cache.put(&key, data.clone());
        tracing::debug!(%ticker, %key, "Fetched from upstream");
        Ok(QuoteResponse {
            source: Source::Upstream,
            data,
        })
    }

    /// Price history for a ticker over a range token.
    pub async fn get_history(
        &self,
        ticker: &str,
        range: &str,
    ) -> Result<QuoteResponse, UpstreamError> {
        let ticker = normalize_ticker(ticker);
        let key = history_key(&ticker, range);
        if let Some(data) = self.cache.get(&key) {
            tracing::debug!(%ticker, %key, "Cache hit");
            return Ok(QuoteResponse {
                source: Source::Cache,
                data,
            });
        }

        let data = self.fetcher.fetch_history(&ticker, range).await?;
        self.cache.put(&key, data.clone());
        tracing::debug!(%ticker, %key, "Fetched from upstream");
        Ok(QuoteResponse {
            source: Source::Upstream,
            data,
        })
    }

    /// Quote lookups for a raw comma-separated ticker list.
    ///
    /// Tickers are processed sequentially, one upstream call at a
    /// time, bounding upstream load at one outstanding call per client
    /// request. Input order and duplicates are preserved; entries that
    /// are empty after trimming are kept as literal empty strings. A
    /// failed ticker becomes an inline error record and never aborts
    /// its siblings.
    pub async fn get_multiple(&self, tickers_raw: &str) -> Vec<QuoteOutcome> {
        let tickers: Vec<String> = tickers_raw.split(',').map(normalize_ticker).collect();

        let mut results = Vec::with_capacity(tickers.len());
        for ticker in tickers {
            match self.get_quote(&ticker).await {
                Ok(QuoteResponse { source, data }) => results.push(QuoteOutcome::Success {
                    ticker,
                    source,
                    data,
                }),
                Err(err) => {
                    tracing::debug!(%ticker, error = %err, "Batch ticker failed");
                    results.push(QuoteOutcome::Failure {
                        ticker,
                        error: err.to_string(),
                    });
                }
            }
        }
        results
    }
}
