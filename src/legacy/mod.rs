//! Legacy host boundary.
//!
//! # Data Flow
//! ```text
//! legacy host (owns the physical request/response)
//!     → LegacyRequest  (read once, at snapshot time)
//!     → LegacyResponse (read and written live for the whole request)
//!         → HeaderStore, CookieCollection, BodyStream (shared handles)
//! ```
//!
//! # Design Decisions
//! - Accessors take `&self`; the host is responsible for its own interior
//!   mutability, the bridge never holds a lock across a callback
//! - Stores are returned as shared handles so adaptors stay live views
//! - `memory` provides a complete in-process host used by the CLI and tests

pub mod cookies;
pub mod headers;
pub mod memory;
pub mod stream;

use url::Url;

pub use cookies::{Cookie, CookieCollection, SameSite};
pub use headers::HeaderStore;
pub use memory::{MemoryRequest, MemoryResponse};
pub use stream::BodyStream;

/// Server variable carrying the request protocol version.
pub const SERVER_PROTOCOL: &str = "SERVER_PROTOCOL";

/// Request side of the legacy host.
pub trait LegacyRequest: Send + Sync {
    /// Request body, aliased by the bridge.
    fn input_stream(&self) -> BodyStream;

    /// Native request header store.
    fn headers(&self) -> HeaderStore;

    fn http_method(&self) -> String;

    /// Request path, including the application path.
    fn path(&self) -> String;

    /// Virtual root the application is mounted under.
    fn application_path(&self) -> String;

    /// Absolute request URL (scheme and query are taken from it).
    fn url(&self) -> Url;

    /// Host server variable such as [`SERVER_PROTOCOL`].
    fn server_variable(&self, name: &str) -> Option<String>;
}

/// Response side of the legacy host.
pub trait LegacyResponse: Send + Sync {
    fn status_code(&self) -> u16;
    fn set_status_code(&self, code: u16);

    fn status_description(&self) -> String;
    fn set_status_description(&self, description: String);

    /// Dedicated redirect field, emitted by the host as `Location`.
    fn redirect_location(&self) -> Option<String>;
    fn set_redirect_location(&self, location: Option<String>);

    /// Dedicated content-type field.
    fn content_type(&self) -> String;
    fn set_content_type(&self, content_type: String);

    /// Native response header store (live).
    fn headers(&self) -> HeaderStore;

    /// Response cookies (live).
    fn cookies(&self) -> CookieCollection;

    /// Response body, aliased by the bridge.
    fn output_stream(&self) -> BodyStream;
}
