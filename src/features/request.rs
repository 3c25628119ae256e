//! Request view: a detached snapshot of the legacy request.
//!
//! # Responsibilities
//! - Copy method, path, path base, scheme, query and protocol at creation
//! - Snapshot request headers into an owned dictionary
//! - Alias (never copy) the legacy input stream
//! - Generate a fresh trace identifier for every request
//!
//! # Design Decisions
//! - Every field can be rewritten by the pipeline; nothing flows back to
//!   the legacy request
//! - Raw target starts absent: the legacy host has no such field

use std::fmt;
use std::sync::{Arc, RwLock};

use uuid::Uuid;

use super::{HttpRequestFeature, HttpRequestIdentifierFeature};
use crate::headers::{HeaderDictionary, RequestHeaders};
use crate::legacy::{BodyStream, LegacyRequest, SERVER_PROTOCOL};
use crate::sync;

struct RequestFields {
    protocol: String,
    scheme: String,
    method: String,
    path_base: String,
    path: String,
    query_string: String,
    raw_target: Option<String>,
    headers: Arc<dyn HeaderDictionary>,
    trace_identifier: String,
    body: BodyStream,
}

/// The adapted request, serving both the request and request-identifier
/// capabilities.
pub struct RequestView {
    fields: RwLock<RequestFields>,
}

impl RequestView {
    /// Snapshot `request`.
    pub fn from_legacy(request: &dyn LegacyRequest) -> Self {
        let url = request.url();
        let query_string = url.query().map(|q| format!("?{}", q)).unwrap_or_default();

        let fields = RequestFields {
            protocol: request.server_variable(SERVER_PROTOCOL).unwrap_or_default(),
            scheme: url.scheme().to_string(),
            method: request.http_method(),
            path_base: request.application_path(),
            path: request.path(),
            query_string,
            raw_target: None,
            headers: Arc::new(RequestHeaders::snapshot(&request.headers())),
            trace_identifier: Uuid::new_v4().to_string(),
            body: request.input_stream(),
        };

        Self {
            fields: RwLock::new(fields),
        }
    }
}

impl fmt::Debug for RequestView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = sync::read(&self.fields);
        f.debug_struct("RequestView")
            .field("trace_identifier", &fields.trace_identifier)
            .field("method", &fields.method)
            .field("scheme", &fields.scheme)
            .field("path_base", &fields.path_base)
            .field("path", &fields.path)
            .field("query_string", &fields.query_string)
            .field("protocol", &fields.protocol)
            .finish_non_exhaustive()
    }
}

impl HttpRequestFeature for RequestView {
    fn protocol(&self) -> String {
        sync::read(&self.fields).protocol.clone()
    }

    fn set_protocol(&self, protocol: String) {
        sync::write(&self.fields).protocol = protocol;
    }

    fn scheme(&self) -> String {
        sync::read(&self.fields).scheme.clone()
    }

    fn set_scheme(&self, scheme: String) {
        sync::write(&self.fields).scheme = scheme;
    }

    fn method(&self) -> String {
        sync::read(&self.fields).method.clone()
    }

    fn set_method(&self, method: String) {
        sync::write(&self.fields).method = method;
    }

    fn path_base(&self) -> String {
        sync::read(&self.fields).path_base.clone()
    }

    fn set_path_base(&self, path_base: String) {
        sync::write(&self.fields).path_base = path_base;
    }

    fn path(&self) -> String {
        sync::read(&self.fields).path.clone()
    }

    fn set_path(&self, path: String) {
        sync::write(&self.fields).path = path;
    }

    fn query_string(&self) -> String {
        sync::read(&self.fields).query_string.clone()
    }

    fn set_query_string(&self, query: String) {
        sync::write(&self.fields).query_string = query;
    }

    fn raw_target(&self) -> Option<String> {
        sync::read(&self.fields).raw_target.clone()
    }

    fn set_raw_target(&self, raw_target: Option<String>) {
        sync::write(&self.fields).raw_target = raw_target;
    }

    fn headers(&self) -> Arc<dyn HeaderDictionary> {
        sync::read(&self.fields).headers.clone()
    }

    fn set_headers(&self, headers: Arc<dyn HeaderDictionary>) {
        sync::write(&self.fields).headers = headers;
    }

    fn body(&self) -> BodyStream {
        sync::read(&self.fields).body.clone()
    }

    fn set_body(&self, body: BodyStream) {
        sync::write(&self.fields).body = body;
    }
}

impl HttpRequestIdentifierFeature for RequestView {
    fn trace_identifier(&self) -> String {
        sync::read(&self.fields).trace_identifier.clone()
    }

    fn set_trace_identifier(&self, identifier: String) {
        sync::write(&self.fields).trace_identifier = identifier;
    }
}
