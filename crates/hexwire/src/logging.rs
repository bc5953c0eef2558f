//! Tracing setup for binaries and tools built on hexwire.

use tracing_subscriber::EnvFilter;

/// Installs a formatting subscriber filtered by `RUST_LOG`, or by
/// `default` when `RUST_LOG` is unset or invalid.
///
/// Returns `false` if a global subscriber was already installed, so it is
/// safe to call more than once.
pub fn init_tracing(default: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}
