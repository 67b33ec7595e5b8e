//! HTTP/JSON API server.
//!
//! Request boundary for the quote proxy: routing, CORS, and the
//! translation of upstream errors into client-visible failure
//! responses. The handlers hold no logic beyond parameter extraction;
//! orchestration lives in [`crate::service`].
//!
//! # Endpoints
//!
//! - `GET /` - Service status/info payload
//! - `GET /health` - Liveness check
//! - `GET /quote/{ticker}` - Current quote
//! - `GET /quote/{ticker}/full` - Quote with fundamentals and dividends
//! - `GET /quote/{ticker}/history?range=1mo` - Price history
//! - `GET /quotes?tickers=A,B,C` - Batch quotes with per-ticker errors

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;

use crate::error::ApiError;
use crate::service::{QuoteOutcome, QuoteResponse, QuoteService};
use crate::upstream::{BrapiClient, DEFAULT_HISTORY_RANGE};

/// Shared state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    service: Arc<QuoteService<BrapiClient>>,
}

impl AppState {
    /// Create server state over a quote service.
    #[must_use]
    pub fn new(service: Arc<QuoteService<BrapiClient>>) -> Self {
        Self { service }
    }
}

/// Create the Axum router with all endpoints.
///
/// CORS is wide open: the proxy fronts a browser-served dashboard and
/// carries no credentials.
#[must_use]
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/quote/{ticker}", get(get_quote))
        .route("/quote/{ticker}/full", get(get_quote_full))
        .route("/quote/{ticker}/history", get(get_history))
        .route("/quotes", get(get_multiple))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Service status/info payload.
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    /// Always "online" when the process answers.
    pub status: &'static str,
    /// Service name.
    pub service: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Current server time.
    pub current_time: DateTime<Utc>,
}

/// Root status/info endpoint.
async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        status: "online",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        current_time: Utc::now(),
    })
}

/// Health check payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "healthy" when the process answers.
    pub status: &'static str,
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

/// Single quote endpoint.
async fn get_quote(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Json<QuoteResponse>, ApiError> {
    let response = state.service.get_quote(&ticker).await?;
    Ok(Json(response))
}

/// Detailed quote endpoint.
async fn get_quote_full(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Json<QuoteResponse>, ApiError> {
    let response = state.service.get_quote_full(&ticker).await?;
    Ok(Json(response))
}

/// Query parameters for the history endpoint.
#[derive(Debug, Deserialize)]
struct HistoryParams {
    range: Option<String>,
}

/// Price history endpoint.
async fn get_history(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<QuoteResponse>, ApiError> {
    let range = params
        .range
        .unwrap_or_else(|| DEFAULT_HISTORY_RANGE.to_string());
    let response = state.service.get_history(&ticker, &range).await?;
    Ok(Json(response))
}

/// Query parameters for the batch endpoint.
#[derive(Debug, Deserialize)]
struct QuotesParams {
    tickers: String,
}

/// Batch quote response.
#[derive(Debug, Serialize)]
pub struct BatchResponse {
    /// Ordered per-ticker outcomes, successes and failures mixed.
    pub results: Vec<QuoteOutcome>,
}

/// Batch quote endpoint. Always responds 200; failures appear as
/// inline error records.
async fn get_multiple(
    State(state): State<AppState>,
    Query(params): Query<QuotesParams>,
) -> Json<BatchResponse> {
    let results = state.service.get_multiple(&params.tickers).await;
    Json(BatchResponse { results })
}

/// HTTP server for the quote proxy.
pub struct ProxyServer {
    port: u16,
    state: AppState,
    cancel: CancellationToken,
}

impl ProxyServer {
    /// Create a new proxy server.
    #[must_use]
    pub const fn new(port: u16, state: AppState, cancel: CancellationToken) -> Self {
        Self {
            port,
            state,
            cancel,
        }
    }

    /// Run the server until cancelled.
    ///
    /// # Errors
    ///
    /// Returns `ServerError` if binding fails or the HTTP server
    /// encounters a fatal error while running.
    pub async fn run(self) -> Result<(), ServerError> {
        let app = create_router(self.state);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindFailed(self.port, e.to_string()))?;

        tracing::info!(port = self.port, "Quote proxy listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(self.cancel.cancelled_owned())
            .await
            .map_err(|e| ServerError::ServerFailed(e.to_string()))?;

        tracing::info!("Quote proxy stopped");
        Ok(())
    }
}

/// HTTP server errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind to port.
    #[error("failed to bind to port {0}: {1}")]
    BindFailed(u16, String),

    /// Server error.
    #[error("server error: {0}")]
    ServerFailed(String),
}
