use crate::base::cookieerror::{CookieError, CookieField};
use crate::cookies::cookiedate::format_http_date;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;
use std::fmt;
use time::{Duration, OffsetDateTime, PrimitiveDateTime};

/// Earliest representable expiry. Assigned when `max-age` is zero or negative.
pub const EXPIRES_MIN: OffsetDateTime = PrimitiveDateTime::MIN.assume_utc();

/// Latest representable expiry. Assigned to session cookies so expiry checks
/// never fire for them.
pub const EXPIRES_MAX: OffsetDateTime = PrimitiveDateTime::MAX.assume_utc();

/// Bytes escaped when rendering a value, so the parser reads it back as-is.
const VALUE_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b',')
    .add(b';')
    .add(b'\\')
    .add(b'%');

const NAME_ENCODE_SET: &AsciiSet = &VALUE_ENCODE_SET.add(b'=');

/// Attributes a server (or caller) may supply alongside a name/value pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieAttributes {
    pub path: Option<String>,
    pub domain: Option<String>,
    pub secure: bool,
    pub http_only: bool,
    /// Lifetime in seconds. Takes precedence over `expires`.
    pub max_age: Option<i64>,
    pub expires: Option<OffsetDateTime>,
}

/// Cookie attributes that a merge can carry over from the record it replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CookieAttribute {
    Path,
    Domain,
    Secure,
    HttpOnly,
    HostOnly,
    MaxAge,
    Expires,
    LastAccess,
}

/// Represents a cookie.
/// Modeled after Chromium's `net::CanonicalCookie`.
///
/// Expiry, persistence and host-only state are derived. They change only
/// through named operations ([`with_max_age`](Self::with_max_age),
/// [`with_expires`](Self::with_expires)) or through jar completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalCookie {
    name: String,
    value: String,
    domain: Option<String>,
    path: Option<String>,
    secure: bool,
    http_only: bool,
    host_only: bool,
    max_age: Option<i64>,
    #[serde(skip)]
    explicit_expires: Option<OffsetDateTime>,
    expiration_time: OffsetDateTime,
    persistent: bool,
    creation_time: OffsetDateTime,
    last_access_time: OffsetDateTime,
}

/// Header field-content: HTAB, visible ASCII plus space, and obs-text.
fn is_field_content(s: &str) -> bool {
    s.chars()
        .all(|c| matches!(c, '\t' | '\x20'..='\x7e' | '\u{80}'..='\u{ff}'))
}

fn checked_field(field: CookieField, s: String) -> Result<String, CookieError> {
    if is_field_content(&s) {
        Ok(s)
    } else {
        Err(CookieError::invalid_field(field))
    }
}

/// Validate an optional attribute; empty strings count as absent.
fn checked_attribute(
    field: CookieField,
    s: Option<String>,
) -> Result<Option<String>, CookieError> {
    match s {
        Some(s) if !s.is_empty() => checked_field(field, s).map(Some),
        _ => Ok(None),
    }
}

fn expiry_from_max_age(seconds: i64, now: OffsetDateTime) -> OffsetDateTime {
    if seconds <= 0 {
        return EXPIRES_MIN;
    }
    now.checked_add(Duration::seconds(seconds))
        .unwrap_or(EXPIRES_MAX)
}

impl CanonicalCookie {
    /// Create a session cookie with no attributes.
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        now: OffsetDateTime,
    ) -> Result<Self, CookieError> {
        Self::with_attributes(name, value, CookieAttributes::default(), now)
    }

    /// Create a cookie, validating every field and deriving its expiry.
    pub fn with_attributes(
        name: impl Into<String>,
        value: impl Into<String>,
        attrs: CookieAttributes,
        now: OffsetDateTime,
    ) -> Result<Self, CookieError> {
        let name = name.into();
        if name.is_empty() {
            return Err(CookieError::invalid_field(CookieField::Name));
        }
        let name = checked_field(CookieField::Name, name)?;
        let value = checked_field(CookieField::Value, value.into())?;
        let path = checked_attribute(CookieField::Path, attrs.path)?;
        let domain = checked_attribute(CookieField::Domain, attrs.domain)?;

        let mut cookie = Self {
            name,
            value,
            domain,
            path,
            secure: attrs.secure,
            http_only: attrs.http_only,
            host_only: false,
            max_age: None,
            explicit_expires: None,
            expiration_time: EXPIRES_MAX,
            persistent: false,
            creation_time: now,
            last_access_time: now,
        };
        if let Some(expires) = attrs.expires {
            cookie.set_expires(expires);
        }
        if let Some(seconds) = attrs.max_age {
            cookie.set_max_age(seconds, now);
        }
        Ok(cookie)
    }

    /// Apply a `max-age` of `seconds`, measured from `now`.
    pub fn with_max_age(mut self, seconds: i64, now: OffsetDateTime) -> Self {
        self.set_max_age(seconds, now);
        self
    }

    /// Apply an explicit `expires`. Ignored for expiry purposes while a
    /// `max-age` is set.
    pub fn with_expires(mut self, at: OffsetDateTime) -> Self {
        self.set_expires(at);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn secure(&self) -> bool {
        self.secure
    }

    pub fn http_only(&self) -> bool {
        self.http_only
    }

    /// True when the domain was filled in from the request host.
    pub fn host_only(&self) -> bool {
        self.host_only
    }

    pub fn max_age(&self) -> Option<i64> {
        self.max_age
    }

    pub fn expiration_time(&self) -> OffsetDateTime {
        self.expiration_time
    }

    /// True when `max-age` or `expires` was set explicitly.
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    pub fn creation_time(&self) -> OffsetDateTime {
        self.creation_time
    }

    pub fn last_access_time(&self) -> OffsetDateTime {
        self.last_access_time
    }

    pub fn is_expired(&self, current_time: OffsetDateTime) -> bool {
        current_time >= self.expiration_time
    }

    /// An empty or whitespace value. A server sends one to delete a cookie.
    pub fn has_blank_value(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// Render the cookie as a `Set-Cookie` style header string.
    ///
    /// Attributes are appended only when set, in the order `expires`, `path`,
    /// `domain`, `httpOnly`. Session cookies carry no `expires`. The name and
    /// value are percent-encoded as in [`Display`](fmt::Display).
    pub fn to_header(&self) -> String {
        let mut header = self.to_string();
        if self.persistent {
            header.push_str("; expires=");
            header.push_str(&format_http_date(self.expiration_time));
        }
        if let Some(path) = &self.path {
            header.push_str("; path=");
            header.push_str(path);
        }
        if let Some(domain) = &self.domain {
            header.push_str("; domain=");
            header.push_str(domain);
        }
        if self.http_only {
            header.push_str("; httpOnly=true");
        }
        header
    }

    pub(crate) fn set_max_age(&mut self, seconds: i64, now: OffsetDateTime) {
        self.max_age = Some(seconds);
        self.expiration_time = expiry_from_max_age(seconds, now);
        self.persistent = true;
    }

    pub(crate) fn set_expires(&mut self, at: OffsetDateTime) {
        self.explicit_expires = Some(at);
        if self.max_age.is_none() {
            self.expiration_time = at;
        }
        self.persistent = true;
    }

    pub(crate) fn set_path(&mut self, path: String) -> Result<(), CookieError> {
        if let Some(path) = checked_attribute(CookieField::Path, Some(path))? {
            self.path = Some(path);
        }
        Ok(())
    }

    pub(crate) fn set_domain(&mut self, domain: String) -> Result<(), CookieError> {
        if let Some(domain) = checked_attribute(CookieField::Domain, Some(domain))? {
            self.domain = Some(domain);
        }
        Ok(())
    }

    pub(crate) fn set_secure(&mut self, secure: bool) {
        self.secure = secure;
    }

    pub(crate) fn set_http_only(&mut self, http_only: bool) {
        self.http_only = http_only;
    }

    /// Fill the domain from the request host, making the cookie host-only.
    pub(crate) fn complete_domain(&mut self, host: &str) {
        self.domain = Some(host.to_string());
        self.host_only = true;
    }

    /// Fill the path with the request's default path when missing.
    pub(crate) fn complete_path(&mut self, default_path: &str) {
        if self.path.is_none() {
            self.path = Some(default_path.to_string());
        }
    }

    /// Take over the identity of `outgoing`, the record this one replaces.
    ///
    /// The creation time always carries over; `copy_keys` names further
    /// attributes to copy, each only when present on `outgoing`. A copied
    /// `max-age` is measured from this record's construction.
    pub(crate) fn inherit_from(
        &mut self,
        outgoing: &CanonicalCookie,
        copy_keys: &[CookieAttribute],
    ) {
        let issued = self.last_access_time;
        self.creation_time = outgoing.creation_time;
        for key in copy_keys {
            match key {
                CookieAttribute::Path => {
                    if outgoing.path.is_some() {
                        self.path.clone_from(&outgoing.path);
                    }
                }
                CookieAttribute::Domain => {
                    if outgoing.domain.is_some() {
                        self.domain.clone_from(&outgoing.domain);
                    }
                }
                CookieAttribute::Secure => {
                    if outgoing.secure {
                        self.secure = true;
                    }
                }
                CookieAttribute::HttpOnly => {
                    if outgoing.http_only {
                        self.http_only = true;
                    }
                }
                CookieAttribute::HostOnly => {
                    if outgoing.host_only {
                        self.host_only = true;
                    }
                }
                CookieAttribute::MaxAge => {
                    if let Some(seconds) = outgoing.max_age {
                        self.set_max_age(seconds, issued);
                    }
                }
                CookieAttribute::Expires => {
                    if outgoing.persistent {
                        self.explicit_expires = outgoing.explicit_expires;
                        self.expiration_time = outgoing.expiration_time;
                        self.persistent = true;
                    }
                }
                CookieAttribute::LastAccess => {
                    self.last_access_time = outgoing.last_access_time;
                }
            }
        }
    }
}

/// Renders the percent-encoded `name=value` pair.
impl fmt::Display for CanonicalCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={}",
            utf8_percent_encode(&self.name, NAME_ENCODE_SET),
            utf8_percent_encode(&self.value, VALUE_ENCODE_SET)
        )
    }
}

impl From<&CanonicalCookie> for cookie::Cookie<'static> {
    fn from(c: &CanonicalCookie) -> Self {
        let mut builder = cookie::Cookie::build((c.name.clone(), c.value.clone()))
            .secure(c.secure)
            .http_only(c.http_only);
        if let Some(domain) = &c.domain {
            builder = builder.domain(domain.clone());
        }
        if let Some(path) = &c.path {
            builder = builder.path(path.clone());
        }
        if let Some(seconds) = c.max_age {
            builder = builder.max_age(Duration::seconds(seconds));
        } else if c.persistent {
            builder = builder.expires(c.expiration_time);
        }
        builder.build()
    }
}
