//! Capability registry handed to the processing pipeline.
//!
//! # Data Flow
//! ```text
//! LegacyRequest  ──snapshot──▶ RequestView ──┬─▶ FeatureKind::Request
//!                                            └─▶ FeatureKind::RequestIdentifier
//! LegacyResponse ──live────▶ ResponseView ────▶ FeatureKind::Response
//!                                                  │
//!                               FeatureSet (ordered, kind-keyed, shared)
//! ```
//!
//! # Design Decisions
//! - Capability kinds are an explicit enum, not runtime type lookup
//! - Typed access goes through [`FeatureType`]; untyped access goes through
//!   [`FeatureKind`] + [`Feature`]
//! - Capabilities are trait objects so the pipeline can swap in its own
//!   implementation with `set`
//! - [`RequestFeatures`] keeps typed handles to the views it built, so the
//!   dispatcher still drives that response view even if the pipeline
//!   replaces the registry entry

pub mod collection;
pub mod lifecycle;
pub mod request;
pub mod response;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::error::BridgeResult;
use crate::headers::HeaderDictionary;
use crate::legacy::{BodyStream, LegacyRequest, LegacyResponse};

pub use collection::FeatureSet;
pub use lifecycle::{Callback, CompletionState, StartState};
pub use request::RequestView;
pub use response::ResponseView;

/// Capability kinds a feature set can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    /// Request line, headers and body ([`HttpRequestFeature`]).
    Request,
    /// Per-request trace identifier ([`HttpRequestIdentifierFeature`]).
    RequestIdentifier,
    /// Status, headers, body and lifecycle ([`HttpResponseFeature`]).
    Response,
    /// Connection upgrade; not provided by the bridge.
    Upgrade,
    /// Streaming response body; not provided by the bridge.
    ResponseBody,
    /// Any other capability, named by the pipeline.
    Custom(&'static str),
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureKind::Request => f.write_str("request"),
            FeatureKind::RequestIdentifier => f.write_str("request-identifier"),
            FeatureKind::Response => f.write_str("response"),
            FeatureKind::Upgrade => f.write_str("upgrade"),
            FeatureKind::ResponseBody => f.write_str("response-body"),
            FeatureKind::Custom(name) => write!(f, "custom:{}", name),
        }
    }
}

/// Request capability.
pub trait HttpRequestFeature: Send + Sync {
    fn protocol(&self) -> String;
    fn set_protocol(&self, protocol: String);

    fn scheme(&self) -> String;
    fn set_scheme(&self, scheme: String);

    fn method(&self) -> String;
    fn set_method(&self, method: String);

    fn path_base(&self) -> String;
    fn set_path_base(&self, path_base: String);

    fn path(&self) -> String;
    fn set_path(&self, path: String);

    /// Query string including the leading `?`, or empty.
    fn query_string(&self) -> String;
    fn set_query_string(&self, query: String);

    fn raw_target(&self) -> Option<String>;
    fn set_raw_target(&self, raw_target: Option<String>);

    fn headers(&self) -> Arc<dyn HeaderDictionary>;
    fn set_headers(&self, headers: Arc<dyn HeaderDictionary>);

    fn body(&self) -> BodyStream;
    fn set_body(&self, body: BodyStream);
}

/// Request identity capability.
pub trait HttpRequestIdentifierFeature: Send + Sync {
    fn trace_identifier(&self) -> String;
    fn set_trace_identifier(&self, identifier: String);
}

/// Response capability.
pub trait HttpResponseFeature: Send + Sync {
    fn status_code(&self) -> u16;
    fn set_status_code(&self, code: u16);

    fn reason_phrase(&self) -> String;
    fn set_reason_phrase(&self, phrase: String);

    fn headers(&self) -> Arc<dyn HeaderDictionary>;
    /// Fails when the headers are bound to the host.
    fn set_headers(&self, headers: Arc<dyn HeaderDictionary>) -> BridgeResult<()>;

    fn body(&self) -> BodyStream;
    /// Fails when the body is bound to the host.
    fn set_body(&self, body: BodyStream) -> BridgeResult<()>;

    fn has_started(&self) -> bool;

    /// Register a callback for the starting phase.
    fn on_starting(&self, callback: Callback);

    /// Register a callback for the completed phase.
    fn on_completed(&self, callback: Callback);

    /// Run the starting phase.
    fn start(&self) -> BoxFuture<'_, BridgeResult<()>>;

    /// Run the completed phase.
    fn complete(&self) -> BoxFuture<'_, BridgeResult<()>>;
}

/// A capability instance stored in a [`FeatureSet`].
#[derive(Clone)]
pub enum Feature {
    Request(Arc<dyn HttpRequestFeature>),
    RequestIdentifier(Arc<dyn HttpRequestIdentifierFeature>),
    Response(Arc<dyn HttpResponseFeature>),
    /// Instance of a kind the bridge does not model itself.
    Other(Arc<dyn Any + Send + Sync>),
}

impl Feature {
    /// Whether this instance may be stored under `kind`.
    pub fn implements(&self, kind: FeatureKind) -> bool {
        matches!(
            (self, kind),
            (Feature::Request(_), FeatureKind::Request)
                | (Feature::RequestIdentifier(_), FeatureKind::RequestIdentifier)
                | (Feature::Response(_), FeatureKind::Response)
                | (
                    Feature::Other(_),
                    FeatureKind::Upgrade | FeatureKind::ResponseBody | FeatureKind::Custom(_)
                )
        )
    }

    fn data_ptr(&self) -> *const () {
        match self {
            Feature::Request(f) => Arc::as_ptr(f) as *const (),
            Feature::RequestIdentifier(f) => Arc::as_ptr(f) as *const (),
            Feature::Response(f) => Arc::as_ptr(f) as *const (),
            Feature::Other(f) => Arc::as_ptr(f) as *const (),
        }
    }

    /// True when both entries are backed by the same object.
    pub fn same_instance(&self, other: &Feature) -> bool {
        std::ptr::eq(self.data_ptr(), other.data_ptr())
    }
}

impl fmt::Debug for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variant = match self {
            Feature::Request(_) => "Request",
            Feature::RequestIdentifier(_) => "RequestIdentifier",
            Feature::Response(_) => "Response",
            Feature::Other(_) => "Other",
        };
        write!(f, "Feature::{}({:p})", variant, self.data_ptr())
    }
}

/// Statically typed access to one capability kind.
pub trait FeatureType: Sized {
    const KIND: FeatureKind;

    fn from_feature(feature: &Feature) -> Option<Self>;
    fn into_feature(self) -> Feature;
}

impl FeatureType for Arc<dyn HttpRequestFeature> {
    const KIND: FeatureKind = FeatureKind::Request;

    fn from_feature(feature: &Feature) -> Option<Self> {
        match feature {
            Feature::Request(f) => Some(f.clone()),
            _ => None,
        }
    }

    fn into_feature(self) -> Feature {
        Feature::Request(self)
    }
}

impl FeatureType for Arc<dyn HttpRequestIdentifierFeature> {
    const KIND: FeatureKind = FeatureKind::RequestIdentifier;

    fn from_feature(feature: &Feature) -> Option<Self> {
        match feature {
            Feature::RequestIdentifier(f) => Some(f.clone()),
            _ => None,
        }
    }

    fn into_feature(self) -> Feature {
        Feature::RequestIdentifier(self)
    }
}

impl FeatureType for Arc<dyn HttpResponseFeature> {
    const KIND: FeatureKind = FeatureKind::Response;

    fn from_feature(feature: &Feature) -> Option<Self> {
        match feature {
            Feature::Response(f) => Some(f.clone()),
            _ => None,
        }
    }

    fn into_feature(self) -> Feature {
        Feature::Response(self)
    }
}

/// Per-request feature set plus typed handles to the views it was built from.
#[derive(Clone)]
pub struct RequestFeatures {
    features: Arc<FeatureSet>,
    request: Arc<RequestView>,
    response: Arc<ResponseView>,
}

impl RequestFeatures {
    /// Snapshot `request`, wrap `response`, and register both views.
    ///
    /// `defaults` are consulted by `get` for kinds the request set lacks.
    pub fn from_legacy(
        request: &dyn LegacyRequest,
        response: Arc<dyn LegacyResponse>,
        defaults: Option<Arc<FeatureSet>>,
        read_only: bool,
    ) -> Self {
        let request = Arc::new(RequestView::from_legacy(request));
        let response = Arc::new(ResponseView::new(response));

        let request_feature: Arc<dyn HttpRequestFeature> = request.clone();
        let identifier_feature: Arc<dyn HttpRequestIdentifierFeature> = request.clone();
        let response_feature: Arc<dyn HttpResponseFeature> = response.clone();

        let features = FeatureSet::build(
            vec![
                request_feature.into_feature(),
                identifier_feature.into_feature(),
                response_feature.into_feature(),
            ],
            defaults,
            read_only,
        );

        tracing::debug!(
            trace_identifier = %request.trace_identifier(),
            method = %request.method(),
            path = %request.path(),
            "Feature set created"
        );

        Self {
            features: Arc::new(features),
            request,
            response,
        }
    }

    /// The registry exposed to the pipeline.
    pub fn features(&self) -> &Arc<FeatureSet> {
        &self.features
    }

    pub fn request(&self) -> &Arc<RequestView> {
        &self.request
    }

    pub fn response(&self) -> &Arc<ResponseView> {
        &self.response
    }
}

impl fmt::Debug for RequestFeatures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestFeatures")
            .field("features", &self.features)
            .field("trace_identifier", &self.request.trace_identifier())
            .finish()
    }
}
