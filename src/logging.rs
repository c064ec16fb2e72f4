//! Logging setup.
//!
//! All diagnostics go through `tracing`. The binary calls [`init`] (or
//! [`init_with`] when `--log-level` was given) once at startup; embedders
//! that may already have a subscriber installed use [`try_init`].

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` if set, otherwise `pycpp_debug=info`.
fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pycpp_debug=info"))
}

/// Install the global subscriber with the default filter.
///
/// # Panics
///
/// Panics if a global subscriber is already set.
pub fn init() {
    tracing_subscriber::registry()
        .with(default_filter())
        .with(tracing_subscriber::fmt::layer().compact())
        .init();
}

/// Install the global subscriber with an explicit filter directive such as
/// `"debug"` or `"pycpp_debug=trace"`. An unparsable directive falls back
/// to the default filter.
pub fn init_with(directive: &str) {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| default_filter());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().compact())
        .init();
}

/// Non-panicking variant of [`init`] for embedding contexts.
pub fn try_init() -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(default_filter())
        .with(tracing_subscriber::fmt::layer().compact())
        .try_init()
}
