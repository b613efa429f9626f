//! Tracing initialization.

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global tracing subscriber.
///
/// Filter level comes from `GROUPER_LOG` (e.g. `grouper_engine=debug`),
/// defaulting to `info`. Safe to call more than once; only the first
/// call wins.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("GROUPER_LOG")
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
