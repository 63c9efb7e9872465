//! Cookie header parsing.
//!
//! Splits raw `Cookie` / `Set-Cookie` text into [`CanonicalCookie`] records.
//! Attribute segments (`path`, `domain`, `max-age`, `expires`, `secure`,
//! `httponly`) attach to the record emitted before them; every other segment
//! starts a new record.

use crate::cookies::canonical_cookie::CanonicalCookie;
use crate::cookies::cookiedate::parse_expires;
use percent_encoding::percent_decode_str;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attribute {
    Path,
    Domain,
    MaxAge,
    Expires,
    Secure,
    HttpOnly,
}

impl Attribute {
    fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "path" => Some(Attribute::Path),
            "domain" => Some(Attribute::Domain),
            "max-age" => Some(Attribute::MaxAge),
            "expires" => Some(Attribute::Expires),
            "secure" => Some(Attribute::Secure),
            "httponly" => Some(Attribute::HttpOnly),
            _ => None,
        }
    }
}

/// Percent-decode, keeping the raw text when it does not decode to UTF-8.
fn decode(raw: &str) -> String {
    match percent_decode_str(raw).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_string(),
    }
}

/// A bare flag is set; an explicit `false` clears it.
fn flag(value: Option<&str>) -> bool {
    !value.is_some_and(|v| v.trim().eq_ignore_ascii_case("false"))
}

/// Parse a cookie header string. `now` becomes each record's creation time
/// and the base for `max-age`.
///
/// Records that fail validation are skipped; the rest of the header is still
/// parsed.
pub fn parse(text: &str, now: OffsetDateTime) -> Vec<CanonicalCookie> {
    let mut cookies: Vec<CanonicalCookie> = Vec::new();
    if text.trim().is_empty() {
        return cookies;
    }

    for segment in text.split(';') {
        let (raw_name, raw_value) = match segment.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (segment, None),
        };
        let name = decode(raw_name.trim());
        if name.is_empty() {
            continue;
        }
        let value = raw_value.map(|v| decode(v.trim()));

        if let Some(attribute) = Attribute::from_name(&name) {
            match cookies.last_mut() {
                Some(cookie) => apply_attribute(cookie, attribute, value, now),
                None => {
                    tracing::debug!(attribute = %name, "cookie attribute before any cookie, discarded");
                }
            }
            continue;
        }

        match CanonicalCookie::new(name, value.unwrap_or_default(), now) {
            Ok(cookie) => cookies.push(cookie),
            Err(e) => tracing::debug!(error = %e, "skipping invalid cookie"),
        }
    }

    cookies
}

fn apply_attribute(
    cookie: &mut CanonicalCookie,
    attribute: Attribute,
    value: Option<String>,
    now: OffsetDateTime,
) {
    match attribute {
        Attribute::Path => {
            if let Some(Err(e)) = value.map(|v| cookie.set_path(v)) {
                tracing::debug!(cookie = %cookie.name(), error = %e, "ignoring cookie path");
            }
        }
        Attribute::Domain => {
            if let Some(Err(e)) = value.map(|v| cookie.set_domain(v)) {
                tracing::debug!(cookie = %cookie.name(), error = %e, "ignoring cookie domain");
            }
        }
        Attribute::MaxAge => match value.as_deref().map(|v| v.trim().parse::<i64>()) {
            Some(Ok(seconds)) => cookie.set_max_age(seconds, now),
            _ => {
                tracing::debug!(cookie = %cookie.name(), value = ?value, "ignoring cookie max-age");
            }
        },
        Attribute::Expires => {
            if let Some(v) = value {
                cookie.set_expires(parse_expires(&v));
            }
        }
        Attribute::Secure => cookie.set_secure(flag(value.as_deref())),
        Attribute::HttpOnly => cookie.set_http_only(flag(value.as_deref())),
    }
}
