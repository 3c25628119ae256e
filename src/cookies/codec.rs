//! `Set-Cookie` serialization and parsing.
//!
//! # Wire Format
//! ```text
//! name=value[; expires=<RFC 1123 GMT>][; domain=D][; path=P][; secure][; samesite=lax|strict|none][; httponly]
//! ```
//!
//! # Design Decisions
//! - Attribute order and lowercase attribute names are fixed on output
//! - Attribute names are matched case-insensitively on input
//! - `expires` is always written as RFC 1123; on input the dashed, RFC 850
//!   and asctime forms are accepted too
//! - No `samesite` attribute ⇔ [`SameSite::Unspecified`], in both directions
//! - A missing `expires` is the no-expiration sentinel (`None`), never the epoch
//! - Unknown attributes and `max-age` are accepted and dropped: the legacy
//!   cookie has nowhere to keep them

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::{BridgeError, BridgeResult};
use crate::legacy::{Cookie, SameSite};

const RFC1123_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Accepted `expires` forms, tried in order: RFC 1123, the dashed
/// Netscape form, RFC 850, asctime.
const HTTP_DATE_FORMATS: [&str; 4] = [
    RFC1123_FORMAT,
    "%a, %d-%b-%Y %H:%M:%S GMT",
    "%A, %d-%b-%y %H:%M:%S GMT",
    "%a %b %e %H:%M:%S %Y",
];

/// Format `date` as an RFC 1123 date in GMT.
pub fn format_http_date(date: &DateTime<Utc>) -> String {
    date.format(RFC1123_FORMAT).to_string()
}

/// Parse a cookie date: any of the HTTP date forms, or RFC 2822 with a
/// numeric zone.
pub fn parse_http_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    HTTP_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .map(|naive| naive.and_utc())
        .or_else(|| {
            DateTime::parse_from_rfc2822(input)
                .ok()
                .map(|d| d.with_timezone(&Utc))
        })
}

/// Serialize one cookie to its `Set-Cookie` string.
pub fn serialize(cookie: &Cookie) -> String {
    let mut out = format!("{}={}", cookie.name, cookie.value);

    if let Some(expires) = &cookie.expires {
        out.push_str("; expires=");
        out.push_str(&format_http_date(expires));
    }
    if !cookie.domain.is_empty() {
        out.push_str("; domain=");
        out.push_str(&cookie.domain);
    }
    if !cookie.path.is_empty() {
        out.push_str("; path=");
        out.push_str(&cookie.path);
    }
    if cookie.secure {
        out.push_str("; secure");
    }
    if let Some(token) = cookie.same_site.as_token() {
        out.push_str("; samesite=");
        out.push_str(token);
    }
    if cookie.http_only {
        out.push_str("; httponly");
    }
    out
}

fn invalid(input: &str, reason: impl Into<String>) -> BridgeError {
    BridgeError::InvalidCookie {
        input: input.to_string(),
        reason: reason.into(),
    }
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_graphic() && !"()<>@,;:\\\"/[]?={}".contains(c)
}

/// Parse a `Set-Cookie` string into a legacy cookie.
pub fn parse(input: &str) -> BridgeResult<Cookie> {
    let mut segments = input.split(';');

    let pair = segments.next().unwrap_or_default().trim();
    let (name, value) = pair
        .split_once('=')
        .ok_or_else(|| invalid(input, "missing '=' in name/value pair"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(invalid(input, "empty cookie name"));
    }
    if !name.chars().all(is_token_char) {
        return Err(invalid(input, format!("invalid character in cookie name '{}'", name)));
    }
    let value = value.trim();
    if value.chars().any(|c| c.is_control()) {
        return Err(invalid(input, "control character in cookie value"));
    }

    let mut cookie = Cookie::new(name, value);

    for segment in segments {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let (attr, attr_value) = match segment.split_once('=') {
            Some((a, v)) => (a.trim(), Some(v.trim())),
            None => (segment, None),
        };

        match attr.to_ascii_lowercase().as_str() {
            "expires" => {
                let raw = attr_value.unwrap_or_default();
                let date = parse_http_date(raw)
                    .ok_or_else(|| invalid(input, format!("invalid expires date '{}'", raw)))?;
                cookie.expires = Some(date);
            }
            "max-age" => {
                let raw = attr_value.unwrap_or_default();
                raw.parse::<i64>()
                    .map_err(|_| invalid(input, format!("invalid max-age '{}'", raw)))?;
            }
            "domain" => cookie.domain = attr_value.unwrap_or_default().to_string(),
            "path" => cookie.path = attr_value.unwrap_or_default().to_string(),
            "secure" => cookie.secure = true,
            "httponly" => cookie.http_only = true,
            "samesite" => {
                let raw = attr_value.unwrap_or_default();
                cookie.same_site = match raw.to_ascii_lowercase().as_str() {
                    "lax" => SameSite::Lax,
                    "strict" => SameSite::Strict,
                    "none" => SameSite::None,
                    _ => return Err(invalid(input, format!("invalid samesite mode '{}'", raw))),
                };
            }
            _ => {}
        }
    }

    Ok(cookie)
}
