//! Tracing bootstrap for the `dash` binary.
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! binary's decision. `RUST_LOG` takes precedence over the CLI level.

use tracing_subscriber::EnvFilter;

/// Install a compact stderr subscriber.
///
/// Returns `false` if a global subscriber was already set.
#[must_use]
pub fn init_tracing(default_level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .is_ok()
}
