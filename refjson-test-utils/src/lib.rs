//! refjson Test Utilities
//!
//! Shared fixtures and setup for the refjson test suites:
//!
//! - Identity-bearing fixture types with hand-written bean decoders/encoders
//! - One-time tracing subscriber installation

pub mod fixtures;

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install a test-writer tracing subscriber filtered by `RUST_LOG`
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(false)
            .try_init();
    });
}
