//! Metrics collection.
//!
//! # Metrics
//! - `bridge_requests_total` (counter): dispatched requests by `outcome`
//! - `bridge_callbacks_total` (counter): lifecycle callbacks run, by `phase`
//! - `bridge_cookie_parse_failures_total` (counter): rejected `Set-Cookie` writes
//!
//! # Design Decisions
//! - Uses the `metrics` facade only; without an installed recorder the
//!   updates are no-ops, exporters belong to the host process

/// Record a dispatched request (`ok` or `error`).
pub fn record_request(outcome: &'static str) {
    metrics::counter!("bridge_requests_total", "outcome" => outcome).increment(1);
}

/// Record one invoked lifecycle callback (`starting` or `completed`).
pub fn record_callback(phase: &'static str) {
    metrics::counter!("bridge_callbacks_total", "phase" => phase).increment(1);
}

pub fn record_cookie_parse_failure() {
    metrics::counter!("bridge_cookie_parse_failures_total").increment(1);
}
