//! Tracing/logging initialization.
//!
//! JSON lines to stdout, level controlled via `RUST_LOG`. The costing
//! and report crates emit `debug!` for every carried-rate computation
//! and `warn!` for every degraded sub-fetch, so `RUST_LOG=debug` is the
//! first stop when a report number looks off.

use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops), which also
/// makes it usable from test setup helpers.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
