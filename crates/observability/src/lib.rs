//! `seragam-observability` — process-wide tracing setup.
//!
//! One global JSON subscriber, filtered by `RUST_LOG` (default `info`).
//! Structured fields over message interpolation: operations log
//! `order`/`student`/`status` fields so log pipelines can index them.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install the global subscriber. Safe to call from every entry point and
/// test; only the first call installs, the rest are no-ops.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        // try_init: another subscriber may already be installed (e.g. a test
        // harness); that is fine.
        let _ = tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init_tracing();
        init_tracing();
        tracing::info!(check = true, "subscriber installed");
    }
}
