//! Tracing subscriber setup
//!
//! Library code only emits `tracing` events; the hosting service (or a
//! test) decides where they go by calling [`init_tracing`] once.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{CoreError, Result};

/// Install a global fmt subscriber filtered by `RUST_LOG`
///
/// `default_filter` is used when `RUST_LOG` is unset or invalid, e.g.
/// `"info,mithlond_navigation=debug"`. Returns an error if a global
/// subscriber is already installed.
pub fn init_tracing(default_filter: &str) -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()
        .map_err(|e| CoreError::Telemetry(e.to_string()))
}

/// Like [`init_tracing`], but ignores an already-installed subscriber
///
/// Convenient for test suites where every test wants logging.
pub fn try_init_tracing(default_filter: &str) {
    if init_tracing(default_filter).is_err() {
        tracing::trace!("Tracing subscriber already installed");
    }
}
