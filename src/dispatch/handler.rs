//! Per-request dispatch.
//!
//! # Data Flow
//! ```text
//! LegacyRequest + LegacyResponse
//!     → RequestFeatures::from_legacy
//!     → create_context
//!     → process_request ──ok──▶ start (starting callbacks)
//!     → complete (always; completed callbacks)
//!     → dispose_context(ctx, error)
//!     → error propagated to the host
//! ```
//!
//! # Design Decisions
//! - A pipeline error wins over a completion error; the latter is logged
//! - Completion is armed in a guard before processing begins, so an aborted
//!   dispatch still runs the completed callbacks

use std::sync::Arc;

use crate::dispatch::application::HttpApplication;
use crate::dispatch::guard::CompletionGuard;
use crate::error::{BridgeError, BridgeResult};
use crate::features::{
    FeatureSet, HttpRequestIdentifierFeature, HttpResponseFeature, RequestFeatures,
};
use crate::legacy::{LegacyRequest, LegacyResponse};
use crate::observability::metrics;

/// Drives one application over legacy request/response pairs.
pub struct RequestDispatcher<A> {
    application: Arc<A>,
    defaults: Option<Arc<FeatureSet>>,
    read_only: bool,
}

impl<A> Clone for RequestDispatcher<A> {
    fn clone(&self) -> Self {
        Self {
            application: self.application.clone(),
            defaults: self.defaults.clone(),
            read_only: self.read_only,
        }
    }
}

impl<A: HttpApplication> RequestDispatcher<A> {
    pub fn new(application: Arc<A>) -> Self {
        Self {
            application,
            defaults: None,
            read_only: false,
        }
    }

    /// Server-level features consulted when a request set has no entry.
    pub fn with_defaults(mut self, defaults: Arc<FeatureSet>) -> Self {
        self.defaults = Some(defaults);
        self
    }

    /// Build every request's feature set read-only.
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn application(&self) -> &Arc<A> {
        &self.application
    }

    /// Process one request through the application.
    pub async fn process(
        &self,
        request: &dyn LegacyRequest,
        response: Arc<dyn LegacyResponse>,
    ) -> BridgeResult<()> {
        let features =
            RequestFeatures::from_legacy(request, response, self.defaults.clone(), self.read_only);
        let trace_identifier = features.request().trace_identifier();
        let view = features.response().clone();

        let mut guard = CompletionGuard::new(view.clone());
        let mut context = self.application.create_context(&features);

        let mut result = match self.application.process_request(&mut context).await {
            Ok(()) => view.start().await,
            Err(e) => Err(BridgeError::Pipeline(e)),
        };

        let completion = view.complete().await;
        guard.disarm();

        if let Err(e) = completion {
            if result.is_ok() {
                result = Err(e);
            } else {
                tracing::warn!(
                    trace_identifier = %trace_identifier,
                    error = %e,
                    "Completion failed after pipeline error"
                );
            }
        }

        self.application
            .dispose_context(context, result.as_ref().err());

        match &result {
            Ok(()) => {
                metrics::record_request("ok");
                tracing::debug!(
                    trace_identifier = %trace_identifier,
                    status = view.status_code(),
                    "Request processed"
                );
            }
            Err(e) => {
                metrics::record_request("error");
                tracing::error!(
                    trace_identifier = %trace_identifier,
                    error = %e,
                    "Request failed"
                );
            }
        }

        result
    }
}
