//! Proxy Configuration Settings
//!
//! Configuration for the quote proxy, loaded from environment
//! variables with fixed defaults. Every variable is optional.

use std::time::Duration;

use crate::cache::CACHE_TTL;

/// Default upstream quote API base.
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://brapi.dev/api";

/// Default HTTP listen port.
pub const DEFAULT_HTTP_PORT: u16 = 8000;

/// Default timeout for a single upstream request.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// Complete proxy configuration.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// HTTP listen port.
    pub http_port: u16,
    /// Base URL of the upstream quote API.
    pub upstream_base_url: String,
    /// Timeout for a single upstream request.
    pub upstream_timeout: Duration,
    /// Freshness window for cached payloads.
    pub cache_ttl: Duration,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            http_port: DEFAULT_HTTP_PORT,
            upstream_base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            upstream_timeout: UPSTREAM_TIMEOUT,
            cache_ttl: CACHE_TTL,
        }
    }
}

impl ProxyConfig {
    /// Create configuration from environment variables.
    ///
    /// Recognized variables (all optional):
    /// - `QUOTE_PROXY_HTTP_PORT`
    /// - `QUOTE_PROXY_UPSTREAM_BASE_URL`
    /// - `QUOTE_PROXY_UPSTREAM_TIMEOUT_SECS`
    /// - `QUOTE_PROXY_CACHE_TTL_SECS`
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            http_port: parse_env_u16("QUOTE_PROXY_HTTP_PORT", defaults.http_port),
            upstream_base_url: std::env::var("QUOTE_PROXY_UPSTREAM_BASE_URL")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.upstream_base_url),
            upstream_timeout: parse_env_duration_secs(
                "QUOTE_PROXY_UPSTREAM_TIMEOUT_SECS",
                defaults.upstream_timeout,
            ),
            cache_ttl: parse_env_duration_secs("QUOTE_PROXY_CACHE_TTL_SECS", defaults.cache_ttl),
        }
    }
}

fn parse_env_u16(key: &str, default: u16) -> u16 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_env_duration_secs(key: &str, default: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map_or(default, Duration::from_secs)
}
