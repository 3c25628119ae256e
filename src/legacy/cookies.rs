//! Legacy cookie object model.

use std::fmt;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use crate::sync;

/// Same-site mode of a cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum SameSite {
    /// No `samesite` attribute is emitted or was present.
    #[default]
    Unspecified,
    None,
    Lax,
    Strict,
}

impl SameSite {
    /// Lowercase wire token, or `None` for [`SameSite::Unspecified`].
    pub fn as_token(&self) -> Option<&'static str> {
        match self {
            SameSite::Unspecified => None,
            SameSite::None => Some("none"),
            SameSite::Lax => Some("lax"),
            SameSite::Strict => Some("strict"),
        }
    }
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token().unwrap_or("unspecified"))
    }
}

/// A cookie as the legacy host stores it.
///
/// `expires == None` is the "no expiration" (session cookie) sentinel; empty
/// `domain` and `path` mean the attribute is not set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub expires: Option<DateTime<Utc>>,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
}

impl Cookie {
    /// Session cookie with no attributes.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: String::new(),
            path: String::new(),
            expires: None,
            secure: false,
            http_only: false,
            same_site: SameSite::default(),
        }
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    pub fn same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }
}

/// Shared, ordered cookie collection of a legacy response.
#[derive(Debug, Clone, Default)]
pub struct CookieCollection {
    cookies: Arc<RwLock<Vec<Cookie>>>,
}

impl CookieCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        sync::read(&self.cookies).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cookie at `index`.
    pub fn get(&self, index: usize) -> Option<Cookie> {
        sync::read(&self.cookies).get(index).cloned()
    }

    /// First cookie named `name`.
    pub fn get_by_name(&self, name: &str) -> Option<Cookie> {
        sync::read(&self.cookies)
            .iter()
            .find(|c| c.name == name)
            .cloned()
    }

    /// Index of the first cookie named `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        sync::read(&self.cookies).iter().position(|c| c.name == name)
    }

    pub fn push(&self, cookie: Cookie) {
        sync::write(&self.cookies).push(cookie);
    }

    /// Replace the cookie with the same name at its position, or append it.
    /// Returns true when an existing cookie was replaced.
    pub fn upsert(&self, cookie: Cookie) -> bool {
        let mut cookies = sync::write(&self.cookies);
        match cookies.iter().position(|c| c.name == cookie.name) {
            Some(i) => {
                cookies[i] = cookie;
                true
            }
            None => {
                cookies.push(cookie);
                false
            }
        }
    }

    /// Remove every cookie named `name`.
    pub fn remove(&self, name: &str) -> bool {
        let mut cookies = sync::write(&self.cookies);
        let before = cookies.len();
        cookies.retain(|c| c.name != name);
        cookies.len() != before
    }

    pub fn clear(&self) {
        sync::write(&self.cookies).clear();
    }

    /// Snapshot of the collection, in order.
    pub fn to_vec(&self) -> Vec<Cookie> {
        sync::read(&self.cookies).clone()
    }

    pub fn ptr_eq(&self, other: &CookieCollection) -> bool {
        Arc::ptr_eq(&self.cookies, &other.cookies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_keeps_position() {
        let cookies = CookieCollection::new();
        cookies.push(Cookie::new("C1", "V1"));
        cookies.push(Cookie::new("C2", "V2"));

        assert!(cookies.upsert(Cookie::new("C1", "V5")));
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies.get(0).map(|c| c.value), Some("V5".to_string()));

        assert!(!cookies.upsert(Cookie::new("C3", "V3")));
        assert_eq!(cookies.position("C3"), Some(2));
    }

    #[test]
    fn test_same_site_tokens() {
        assert_eq!(SameSite::default(), SameSite::Unspecified);
        assert_eq!(SameSite::Unspecified.as_token(), None);
        assert_eq!(SameSite::Strict.to_string(), "strict");
    }
}
