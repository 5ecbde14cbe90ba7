//! Tracing setup.
//!
//! Console subscriber with `RUST_LOG`-style filtering. The engine itself
//! only emits `tracing` events; installing a subscriber is the embedding
//! process's choice.

use tracing_subscriber::EnvFilter;

/// Initialize console tracing with an environment filter.
///
/// Defaults to `info` when `RUST_LOG` is unset. Safe to call more than
/// once (subsequent calls are no-ops), so tests can call it freely.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_tracing_is_idempotent() {
        init_tracing();
        init_tracing();
    }
}
