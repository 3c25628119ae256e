//! Live response header adaptor.
//!
//! # Responsibilities
//! - Read and write the legacy response's native header store on every call
//! - Redirect four header names to dedicated legacy fields:
//!   - `Location` ⇄ redirect-location field
//!   - `Set-Cookie` ⇄ legacy cookie collection, through the cookie codec
//!   - `Content-Type` writes go to the store and the content-type field
//!   - `Content-Length` typed accessors (see [`HeaderDictionary::content_length`])
//!
//! # Design Decisions
//! - No cached state: two adaptors over one response see each other's writes
//! - Special names are reached through `get`/`set`; enumeration, `keys`,
//!   `contains_key` and `try_get` reflect the native store only
//! - A multi-value `Set-Cookie` write is parsed in full before anything is
//!   applied, so one bad value leaves the collection untouched

use std::fmt;
use std::sync::Arc;

use super::{names, HeaderDictionary, HeaderValues};
use crate::cookies::codec;
use crate::error::BridgeResult;
use crate::legacy::LegacyResponse;
use crate::observability::metrics;

/// Header dictionary view over a legacy response.
#[derive(Clone)]
pub struct ResponseHeaders {
    response: Arc<dyn LegacyResponse>,
}

impl ResponseHeaders {
    pub fn new(response: Arc<dyn LegacyResponse>) -> Self {
        Self { response }
    }

    fn read_cookies(&self) -> HeaderValues {
        self.response
            .cookies()
            .to_vec()
            .iter()
            .map(codec::serialize)
            .collect()
    }

    fn write_cookies(&self, value: &HeaderValues) -> BridgeResult<()> {
        let parsed = value
            .iter()
            .map(|raw| codec::parse(raw))
            .collect::<BridgeResult<Vec<_>>>()
            .inspect_err(|e| {
                metrics::record_cookie_parse_failure();
                tracing::warn!(error = %e, "Rejected Set-Cookie write");
            })?;

        let cookies = self.response.cookies();
        for cookie in parsed {
            let name = cookie.name.clone();
            let replaced = cookies.upsert(cookie);
            tracing::trace!(cookie = %name, replaced, "Applied Set-Cookie");
        }
        Ok(())
    }
}

impl fmt::Debug for ResponseHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.response.headers().entries()).finish()
    }
}

impl HeaderDictionary for ResponseHeaders {
    fn get(&self, key: &str) -> HeaderValues {
        match key {
            names::LOCATION => HeaderValues::from(self.response.redirect_location()),
            names::SET_COOKIE => self.read_cookies(),
            _ => HeaderValues::from(self.response.headers().get(key)),
        }
    }

    fn set(&self, key: &str, value: HeaderValues) -> BridgeResult<()> {
        match key {
            names::LOCATION => {
                self.response
                    .set_redirect_location(value.first().map(str::to_string));
            }
            names::SET_COOKIE => self.write_cookies(&value)?,
            _ => {
                let joined = value.joined();
                self.response.headers().set(key, joined.clone());
                if key == names::CONTENT_TYPE {
                    self.response.set_content_type(joined);
                }
            }
        }
        Ok(())
    }

    fn try_get(&self, key: &str) -> Option<HeaderValues> {
        self.response.headers().get(key).map(HeaderValues::from)
    }

    fn contains_key(&self, key: &str) -> bool {
        self.response.headers().contains(key)
    }

    /// Appends to any existing values, like the legacy store does.
    fn add(&self, key: &str, value: HeaderValues) -> BridgeResult<()> {
        self.response.headers().add(key, value.joined());
        Ok(())
    }

    fn remove(&self, key: &str) -> bool {
        self.response.headers().remove(key)
    }

    fn clear(&self) {
        self.response.headers().clear();
    }

    fn keys(&self) -> Vec<String> {
        self.response.headers().keys()
    }

    fn entries(&self) -> Vec<(String, HeaderValues)> {
        self.response
            .headers()
            .entries()
            .into_iter()
            .map(|(k, v)| (k, HeaderValues::from(v)))
            .collect()
    }

    fn len(&self) -> usize {
        self.response.headers().len()
    }
}
