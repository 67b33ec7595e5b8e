//! Tracing initialization.
//!
//! Structured logging via `tracing` with an env-filter. Log level is
//! controlled with `RUST_LOG` (default: info for this crate).

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize the tracing subscriber.
///
/// Call once at startup, before any other work. Subsequent calls are
/// no-ops (the global subscriber can only be set once).
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("quote_proxy=info,tower_http=info"));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
