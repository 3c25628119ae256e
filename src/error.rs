//! Error taxonomy for the bridge.
//!
//! # Categories
//! - Unsupported operations: replacing the response headers or body stream
//! - Local parse failures: malformed `Set-Cookie` strings, non-numeric `Content-Length`
//! - Registry misuse: read-only feature sets, feature/kind mismatches
//! - Propagated failures: lifecycle callbacks and the processing pipeline
//!
//! Nothing in the bridge retries; every error is surfaced to the caller.

use thiserror::Error;

use crate::features::FeatureKind;

/// Boxed error produced by application code (callbacks, pipeline).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by the bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The response header dictionary is bound to the legacy response.
    #[error("Unable to change the response headers of the response: they are bound to the legacy host response")]
    HeadersNotSupported,

    /// The response body stream is bound to the legacy response.
    #[error("Unable to change the response stream body of the response: it is bound to the legacy host response")]
    BodyNotSupported,

    /// A `Set-Cookie` value could not be parsed.
    #[error("Invalid Set-Cookie value '{input}': {reason}")]
    InvalidCookie { input: String, reason: String },

    /// The stored `Content-Length` header is not a number.
    #[error("Invalid Content-Length value '{0}'")]
    InvalidContentLength(String),

    /// `add` was called for a key already present in an owned dictionary.
    #[error("Header '{0}' already exists")]
    DuplicateHeader(String),

    /// `copy_to` target slice is too small.
    #[error("Destination too small: {needed} entries needed, {available} available")]
    CopyOutOfRange { needed: usize, available: usize },

    /// The feature set was created read-only.
    #[error("The feature collection is read-only")]
    ReadOnlyFeatures,

    /// A feature instance was stored under a kind it does not implement.
    #[error("Feature instance does not implement the {kind} capability")]
    FeatureMismatch { kind: FeatureKind },

    /// A starting or completed callback failed.
    #[error("Response callback failed: {0}")]
    Callback(#[source] BoxError),

    /// The processing pipeline failed.
    #[error("Request processing failed: {0}")]
    Pipeline(#[source] BoxError),
}

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;
