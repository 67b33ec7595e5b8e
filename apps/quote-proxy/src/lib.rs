#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::default_trait_access
    )
)]

//! Quote Proxy - Read-Through Quote Cache
//!
//! A small HTTP proxy in front of the brapi.dev stock quote API. It
//! accepts ticker-symbol queries, serves fresh cached copies when it
//! has them, and otherwise fetches from upstream and caches the
//! result. Every response carries a provenance tag (`cache` or
//! `upstream`).
//!
//! # Modules
//!
//! - `cache`: TTL-based in-memory store for upstream payloads
//! - `upstream`: HTTP client for the three upstream query shapes
//! - `service`: cache-then-upstream orchestration and batch fan-out
//! - `server`: axum routing, CORS, and error translation
//! - `config`: environment-driven settings
//! - `error`: upstream error taxonomy and the HTTP boundary wrapper
//! - `telemetry`: tracing setup
//!
//! # Data Flow
//!
//! ```text
//! client ──► server ──► service ──► cache (fresh? return it)
//!                          │
//!                          └─ miss ──► upstream ──► cache.put ──► client
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// TTL-based in-memory cache for upstream payloads.
pub mod cache;

/// Environment-driven configuration.
pub mod config;

/// Error taxonomy and HTTP boundary error wrapper.
pub mod error;

/// HTTP routing and server lifecycle.
pub mod server;

/// Cache-then-upstream lookup orchestration.
pub mod service;

/// Tracing initialization.
pub mod telemetry;

/// Upstream quote API client.
pub mod upstream;

pub use cache::{CACHE_TTL, QuoteCache};
pub use config::ProxyConfig;
pub use error::{ApiError, UpstreamError};
pub use server::{AppState, ProxyServer, ServerError, create_router};
pub use service::{QuoteOutcome, QuoteResponse, QuoteService, Source, normalize_ticker};
pub use upstream::{BrapiClient, DEFAULT_HISTORY_RANGE, QuoteFetcher};
