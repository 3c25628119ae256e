//! Canonical names of the headers the response adaptor treats specially.
//!
//! Matching against these is case-sensitive.

pub const LOCATION: &str = "Location";
pub const SET_COOKIE: &str = "Set-Cookie";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_LENGTH: &str = "Content-Length";
