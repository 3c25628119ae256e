//! In-process legacy host.
//!
//! Holds the request/response pair entirely in memory. Used by the
//! `feature-bridge` binary and as the test double for every bridge test.

use std::collections::HashMap;
use std::sync::Mutex;

use url::Url;

use super::{
    BodyStream, CookieCollection, HeaderStore, LegacyRequest, LegacyResponse, SERVER_PROTOCOL,
};
use crate::sync;

/// Legacy request built from a URL.
#[derive(Debug, Clone)]
pub struct MemoryRequest {
    method: String,
    url: Url,
    application_path: String,
    headers: HeaderStore,
    body: BodyStream,
    server_variables: HashMap<String, String>,
}

impl MemoryRequest {
    /// `HTTP/1.1` request for `url`, mounted at `/`, with no headers or body.
    pub fn new(method: impl Into<String>, url: Url) -> Self {
        let mut server_variables = HashMap::new();
        server_variables.insert(SERVER_PROTOCOL.to_string(), "HTTP/1.1".to_string());
        Self {
            method: method.into(),
            url,
            application_path: "/".to_string(),
            headers: HeaderStore::new(),
            body: BodyStream::new(),
            server_variables,
        }
    }

    /// Append a request header value.
    pub fn with_header(self, name: &str, value: impl Into<String>) -> Self {
        self.headers.add(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = BodyStream::from_bytes(body);
        self
    }

    pub fn with_application_path(mut self, path: impl Into<String>) -> Self {
        self.application_path = path.into();
        self
    }

    pub fn with_server_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.server_variables.insert(name.into(), value.into());
        self
    }
}

impl LegacyRequest for MemoryRequest {
    fn input_stream(&self) -> BodyStream {
        self.body.clone()
    }

    fn headers(&self) -> HeaderStore {
        self.headers.clone()
    }

    fn http_method(&self) -> String {
        self.method.clone()
    }

    fn path(&self) -> String {
        self.url.path().to_string()
    }

    fn application_path(&self) -> String {
        self.application_path.clone()
    }

    fn url(&self) -> Url {
        self.url.clone()
    }

    fn server_variable(&self, name: &str) -> Option<String> {
        self.server_variables.get(name).cloned()
    }
}

#[derive(Debug)]
struct ResponseFields {
    status_code: u16,
    status_description: String,
    redirect_location: Option<String>,
    content_type: String,
}

/// Legacy response with the host's usual defaults (`200 OK`, `text/html`).
#[derive(Debug)]
pub struct MemoryResponse {
    fields: Mutex<ResponseFields>,
    headers: HeaderStore,
    cookies: CookieCollection,
    output: BodyStream,
}

impl Default for MemoryResponse {
    fn default() -> Self {
        Self {
            fields: Mutex::new(ResponseFields {
                status_code: 200,
                status_description: "OK".to_string(),
                redirect_location: None,
                content_type: "text/html".to_string(),
            }),
            headers: HeaderStore::new(),
            cookies: CookieCollection::new(),
            output: BodyStream::new(),
        }
    }
}

impl MemoryResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Response over an existing header store.
    pub fn with_headers(headers: HeaderStore) -> Self {
        Self {
            headers,
            ..Self::default()
        }
    }

    /// Response over an existing cookie collection.
    pub fn with_cookies(cookies: CookieCollection) -> Self {
        Self {
            cookies,
            ..Self::default()
        }
    }
}

impl LegacyResponse for MemoryResponse {
    fn status_code(&self) -> u16 {
        sync::lock(&self.fields).status_code
    }

    fn set_status_code(&self, code: u16) {
        sync::lock(&self.fields).status_code = code;
    }

    fn status_description(&self) -> String {
        sync::lock(&self.fields).status_description.clone()
    }

    fn set_status_description(&self, description: String) {
        sync::lock(&self.fields).status_description = description;
    }

    fn redirect_location(&self) -> Option<String> {
        sync::lock(&self.fields).redirect_location.clone()
    }

    fn set_redirect_location(&self, location: Option<String>) {
        sync::lock(&self.fields).redirect_location = location;
    }

    fn content_type(&self) -> String {
        sync::lock(&self.fields).content_type.clone()
    }

    fn set_content_type(&self, content_type: String) {
        sync::lock(&self.fields).content_type = content_type;
    }

    fn headers(&self) -> HeaderStore {
        self.headers.clone()
    }

    fn cookies(&self) -> CookieCollection {
        self.cookies.clone()
    }

    fn output_stream(&self) -> BodyStream {
        self.output.clone()
    }
}
