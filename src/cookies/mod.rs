//! Cookie codec between the legacy cookie model and `Set-Cookie` strings.
//!
//! The response adaptor serializes the live legacy cookie collection when the
//! pipeline reads `Set-Cookie`, and parses each value back into legacy cookies
//! when it writes `Set-Cookie`.

pub mod codec;

pub use codec::{format_http_date, parse, parse_http_date, serialize};
