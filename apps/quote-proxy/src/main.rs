//! Quote Proxy Binary
//!
//! Starts the read-through quote caching proxy.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p quote-proxy
//! ```
//!
//! # Environment Variables (all optional)
//!
//! - `QUOTE_PROXY_HTTP_PORT`: HTTP listen port (default: 8000)
//! - `QUOTE_PROXY_UPSTREAM_BASE_URL`: Upstream API base (default: <https://brapi.dev/api>)
//! - `QUOTE_PROXY_UPSTREAM_TIMEOUT_SECS`: Upstream request timeout (default: 30)
//! - `QUOTE_PROXY_CACHE_TTL_SECS`: Cache freshness window (default: 300)
//! - `RUST_LOG`: Log level (default: info)

use std::sync::Arc;

use quote_proxy::server::{AppState, ProxyServer};
use quote_proxy::{BrapiClient, ProxyConfig, QuoteCache, QuoteService, telemetry};
use tokio::signal;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    telemetry::init();

    tracing::info!("Starting quote proxy");

    let config = ProxyConfig::from_env();
    log_config(&config);

    let cache = Arc::new(QuoteCache::new(config.cache_ttl));
    let client = BrapiClient::new(&config.upstream_base_url, config.upstream_timeout)?;
    let service = Arc::new(QuoteService::new(cache, client));

    let shutdown_token = CancellationToken::new();
    let server = ProxyServer::new(
        config.http_port,
        AppState::new(service),
        shutdown_token.clone(),
    );

    let signal_token = shutdown_token.clone();
    tokio::spawn(async move {
        await_shutdown(signal_token).await;
    });

    server.run().await?;
    Ok(())
}

/// Load .env file from current directory or any ancestor directory.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Log the parsed configuration.
fn log_config(config: &ProxyConfig) {
    tracing::info!(
        http_port = config.http_port,
        upstream_base_url = %config.upstream_base_url,
        upstream_timeout_secs = config.upstream_timeout.as_secs(),
        cache_ttl_secs = config.cache_ttl.as_secs(),
        "Configuration loaded"
    );
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
#[allow(clippy::expect_used)]
async fn await_shutdown(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }

    shutdown_token.cancel();
}
