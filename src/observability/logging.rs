//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for the binary
//! - Resolve the log filter: `RUST_LOG` first, configured level otherwise
//!
//! # Design Decisions
//! - The library only emits `tracing` events; installing a subscriber is
//!   left to the host process
//! - Fields are structured (`trace_identifier`, `method`, `path`, `error`)

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Filter directive used when `RUST_LOG` is not set.
pub fn default_directive(config: &ObservabilityConfig) -> String {
    format!("http_feature_bridge={0},feature_bridge={0}", config.log_level)
}

/// Install the global subscriber. Returns false if one was already set.
pub fn init(config: &ObservabilityConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directive(config).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}
