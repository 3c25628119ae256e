//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! bridge components produce:
//!     → tracing events (structured, keyed by trace identifier)
//!     → metrics.rs (counters through the `metrics` facade)
//!
//! host process consumes:
//!     → logging.rs installs the subscriber (binary only)
//!     → any metrics recorder/exporter it chooses
//! ```

pub mod logging;
pub mod metrics;
