//! # Telemetry
//!
//! Tracing subscriber setup for binaries embedding the engine.
//!
//! The filter comes from `RUST_LOG` (default `info`). Client-caused
//! negotiation failures are surfaced to callers, not logged here; the
//! engine logs state transitions at `info`, per-operation detail at
//! `debug`, and swallowed notification failures at `warn`.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initializes the global tracing subscriber.
///
/// Safe to call once per process; later calls are ignored so tests that
/// race on initialization do not panic.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init();
        init();
    }
}
