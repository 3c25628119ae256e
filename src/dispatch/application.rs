//! The processing pipeline contract.

use futures_util::future::BoxFuture;

use crate::error::{BoxError, BridgeError};
use crate::features::RequestFeatures;

/// An application the bridge hands requests to.
///
/// One context is created per request and disposed exactly once, after the
/// response's completion phase ran.
pub trait HttpApplication: Send + Sync {
    type Context: Send;

    /// Build the per-request context from the feature set.
    fn create_context(&self, features: &RequestFeatures) -> Self::Context;

    /// Process the request. Errors are reported to `dispose_context` and then
    /// returned from the dispatcher.
    fn process_request<'a>(
        &'a self,
        context: &'a mut Self::Context,
    ) -> BoxFuture<'a, Result<(), BoxError>>;

    /// Release the context. `error` is set when processing or a lifecycle
    /// phase failed.
    fn dispose_context(&self, context: Self::Context, error: Option<&BridgeError>);
}
