//! Tracing subscriber setup.
//!
//! Events are written as one JSON object per line so CloudWatch Logs Insights
//! can query fields directly. Lambda stamps every line itself, so the
//! formatter omits its own timestamp.

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Filter comes from `RUST_LOG`, default `info`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(true)
        .with_span_list(false)
        .with_target(false)
        .without_time()
        .init();
}
