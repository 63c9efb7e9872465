//! The cookie jar: an ordered set of cookies scoped to an optional request URL.
//!
//! A [`CookieJar`] fills in attributes the server omitted, drops cookies that
//! do not apply to its request URL, sweeps expired cookies, and merges in the
//! cookies of a newer response.

use crate::base::clock::{Clock, SystemClock};
use crate::base::cookieerror::CookieError;
use crate::cookies::canonical_cookie::{CanonicalCookie, CookieAttribute, CookieAttributes};
use crate::cookies::matcher::RequestScope;
use crate::cookies::parser;
use http::header::{HeaderMap, HeaderValue, SET_COOKIE};
use std::sync::Arc;
use time::OffsetDateTime;
use url::Url;

fn system_clock() -> Arc<dyn Clock> {
    Arc::new(SystemClock)
}

/// Cookies for one logical jar, in discovery order.
///
/// Not internally synchronized; every mutation takes `&mut self`.
#[derive(Debug, Clone)]
pub struct CookieJar {
    cookies: Vec<CanonicalCookie>,
    scope: Option<RequestScope>,
    clock: Arc<dyn Clock>,
}

impl Default for CookieJar {
    fn default() -> Self {
        Self::new()
    }
}

impl CookieJar {
    /// An empty, unbound jar reading wall-clock time.
    pub fn new() -> Self {
        Self::with_clock(system_clock())
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            cookies: Vec::new(),
            scope: None,
            clock,
        }
    }

    pub fn builder() -> CookieJarBuilder {
        CookieJarBuilder::default()
    }

    /// Parse a cookie header into an unbound jar.
    pub fn parse(header: &str) -> Self {
        let mut jar = Self::new();
        jar.cookies = parser::parse(header, jar.clock.now());
        jar
    }

    /// Collect every `Set-Cookie` header of a response into a jar bound to
    /// the request `url`.
    pub fn from_response_headers(
        headers: &HeaderMap,
        url: &str,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CookieError> {
        let scope = RequestScope::parse(url)?;
        let now = clock.now();

        let mut cookies = Vec::new();
        for value in headers.get_all(SET_COOKIE) {
            match std::str::from_utf8(value.as_bytes()) {
                Ok(line) => cookies.extend(parser::parse(line, now)),
                Err(e) => {
                    tracing::debug!(error = %e, "skipping non UTF-8 Set-Cookie header");
                }
            }
        }

        let mut jar = Self {
            cookies,
            scope: None,
            clock,
        };
        jar.bind(scope);
        Ok(jar)
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// The bound request URL, if any.
    pub fn url(&self) -> Option<&Url> {
        self.scope.as_ref().map(RequestScope::url)
    }

    pub fn scope(&self) -> Option<&RequestScope> {
        self.scope.as_ref()
    }

    /// Bind the jar to an absolute request URL and complete missing
    /// attributes against it.
    pub fn set_url(&mut self, url: &str) -> Result<(), CookieError> {
        let scope = RequestScope::parse(url)?;
        self.bind(scope);
        Ok(())
    }

    pub fn bind(&mut self, scope: RequestScope) {
        tracing::trace!(url = %scope.url(), "binding cookie jar");
        self.scope = Some(scope);
        self.fill_missing_attributes();
    }

    /// Drop the bound URL. Matching and filtering become no-ops.
    pub fn unbind(&mut self) {
        self.scope = None;
    }

    pub fn cookies(&self) -> &[CanonicalCookie] {
        &self.cookies
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CanonicalCookie> {
        self.cookies.iter()
    }

    pub fn into_cookies(self) -> Vec<CanonicalCookie> {
        self.cookies
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// First cookie with exactly this name.
    pub fn get(&self, name: &str) -> Option<&CanonicalCookie> {
        self.cookies.iter().find(|c| c.name() == name)
    }

    /// Add a cookie, replacing every cookie of the same name regardless of
    /// its domain or path.
    pub fn set(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        attrs: CookieAttributes,
    ) -> Result<(), CookieError> {
        let cookie = CanonicalCookie::with_attributes(name, value, attrs, self.clock.now())?;
        self.cookies.retain(|c| c.name() != cookie.name());
        self.cookies.push(cookie);
        Ok(())
    }

    /// Domain-match against the bound URL. False when unbound.
    pub fn domain_matches(&self, cookie_domain: &str) -> bool {
        self.scope
            .as_ref()
            .is_some_and(|s| s.domain_matches(cookie_domain))
    }

    /// Path-match against the bound URL's default path. False when unbound.
    pub fn path_matches(&self, cookie_path: &str) -> bool {
        self.scope
            .as_ref()
            .is_some_and(|s| s.path_matches(cookie_path))
    }

    /// Fill `domain` (host-only) and `path` for cookies the server sent
    /// without them.
    pub fn fill_missing_attributes(&mut self) {
        let Some(scope) = &self.scope else {
            return;
        };
        let Some(host) = scope.host() else {
            return;
        };
        for cookie in &mut self.cookies {
            if cookie.domain().is_none() {
                cookie.complete_domain(host);
            }
            cookie.complete_path(scope.default_path());
        }
    }

    /// Remove cookies that do not apply to the bound URL and return them in
    /// their original order.
    ///
    /// Cookies without a domain are first-party: they are completed from the
    /// request host and always kept.
    pub fn filter(&mut self) -> Vec<CanonicalCookie> {
        let Some(scope) = &self.scope else {
            return Vec::new();
        };
        let Some(host) = scope.host() else {
            return Vec::new();
        };

        let mut kept = Vec::with_capacity(self.cookies.len());
        let mut removed = Vec::new();
        for mut cookie in std::mem::take(&mut self.cookies) {
            cookie.complete_path(scope.default_path());
            let applies = match cookie.domain() {
                None => {
                    cookie.complete_domain(host);
                    true
                }
                Some(domain) => {
                    scope.domain_matches(domain)
                        && scope.path_matches(cookie.path().unwrap_or_default())
                }
            };
            if applies {
                kept.push(cookie);
            } else {
                removed.push(cookie);
            }
        }
        self.cookies = kept;

        if !removed.is_empty() {
            tracing::debug!(host = %host, removed = removed.len(), "filtered foreign cookies");
        }
        removed
    }

    /// Remove cookies expired at the clock's current time.
    pub fn clear_expired(&mut self) -> Vec<CanonicalCookie> {
        let now = self.clock.now();
        self.clear_expired_at(now)
    }

    /// Remove cookies with `now >= expires` and return them in order.
    pub fn clear_expired_at(&mut self, now: OffsetDateTime) -> Vec<CanonicalCookie> {
        let (expired, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.cookies)
            .into_iter()
            .partition(|c| c.is_expired(now));
        self.cookies = kept;

        if !expired.is_empty() {
            tracing::debug!(expired = expired.len(), "cleared expired cookies");
        }
        expired
    }

    /// Apply a newer set of cookies (typically a response's) over this jar.
    ///
    /// Every existing cookie is checked against the first incoming cookie of
    /// the same name, and is replaced only when `incoming`'s bound URL
    /// matches the existing cookie's domain and path. The replacement takes
    /// the old slot, keeps the old creation time, and receives the
    /// `copy_keys` attributes present on the old cookie; further covered
    /// cookies of that name are dropped so the jar holds one copy. Incoming
    /// cookies with blank values delete every covered cookie instead of
    /// replacing. Incoming cookies that matched nothing are appended unless
    /// blank.
    pub fn merge(&mut self, incoming: &CookieJar, copy_keys: &[CookieAttribute]) {
        if incoming.is_empty() {
            return;
        }
        if self.cookies.is_empty() {
            self.cookies = incoming
                .iter()
                .filter(|c| !c.has_blank_value())
                .cloned()
                .collect();
            return;
        }

        let mut applied = vec![false; incoming.len()];
        let mut merged = Vec::with_capacity(self.cookies.len() + incoming.len());

        for existing in std::mem::take(&mut self.cookies) {
            let slot = incoming
                .cookies
                .iter()
                .position(|c| c.name() == existing.name())
                .filter(|_| incoming.scope_covers(&existing));

            let Some(idx) = slot else {
                merged.push(existing);
                continue;
            };
            let superseded = std::mem::replace(&mut applied[idx], true);

            let fresh = &incoming.cookies[idx];
            if fresh.has_blank_value() {
                tracing::debug!(cookie = %existing.name(), "cookie deleted by merge");
            } else if superseded {
                tracing::debug!(cookie = %existing.name(), "duplicate cookie dropped by merge");
            } else {
                let mut replacement = fresh.clone();
                replacement.inherit_from(&existing, copy_keys);
                tracing::debug!(cookie = %replacement.name(), "cookie replaced by merge");
                merged.push(replacement);
            }
        }

        merged.extend(
            incoming
                .iter()
                .zip(applied)
                .filter(|(c, applied)| !*applied && !c.has_blank_value())
                .map(|(c, _)| c.clone()),
        );
        self.cookies = merged;
    }

    /// Whether this jar's bound URL falls inside `cookie`'s domain and path.
    fn scope_covers(&self, cookie: &CanonicalCookie) -> bool {
        self.domain_matches(cookie.domain().unwrap_or_default())
            && self.path_matches(cookie.path().unwrap_or_default())
    }

    /// Render the jar. `to_server` selects the `Cookie` request form
    /// (`name=value` pairs); otherwise each cookie is rendered with its
    /// attributes.
    pub fn to_header_string(&self, to_server: bool) -> String {
        let parts: Vec<String> = if to_server {
            self.cookies.iter().map(ToString::to_string).collect()
        } else {
            self.cookies.iter().map(CanonicalCookie::to_header).collect()
        };
        parts.join("; ")
    }

    /// The `Cookie` request header for this jar, `None` when empty.
    pub fn request_header_value(&self) -> Option<HeaderValue> {
        if self.cookies.is_empty() {
            return None;
        }
        match HeaderValue::from_str(&self.to_header_string(true)) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(error = %e, "cookie header is not a valid header value");
                None
            }
        }
    }

    /// Merge the `Set-Cookie` headers of a response to `url` into this jar.
    pub fn store_response(&mut self, url: &str, headers: &HeaderMap) -> Result<(), CookieError> {
        let incoming = Self::from_response_headers(headers, url, Arc::clone(&self.clock))?;
        self.merge(&incoming, &[]);
        Ok(())
    }
}

impl<'a> IntoIterator for &'a CookieJar {
    type Item = &'a CanonicalCookie;
    type IntoIter = std::slice::Iter<'a, CanonicalCookie>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Builder for [`CookieJar`].
///
/// # Example
/// ```
/// use cookiejar::cookies::jar::CookieJar;
///
/// let jar = CookieJar::builder()
///     .header("sid=abc; ssid=xyz")
///     .url("http://bar.com/")
///     .build()?;
/// assert_eq!(jar.to_header_string(true), "sid=abc; ssid=xyz");
/// # Ok::<(), cookiejar::base::cookieerror::CookieError>(())
/// ```
#[derive(Debug, Default)]
pub struct CookieJarBuilder {
    header: Option<String>,
    url: Option<String>,
    clock: Option<Arc<dyn Clock>>,
}

impl CookieJarBuilder {
    /// Cookie header text to parse into the jar.
    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    /// Absolute request URL to bind.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> Result<CookieJar, CookieError> {
        let mut jar = CookieJar::with_clock(self.clock.unwrap_or_else(system_clock));
        if let Some(header) = &self.header {
            jar.cookies = parser::parse(header, jar.clock.now());
        }
        if let Some(url) = &self.url {
            jar.set_url(url)?;
        }
        Ok(jar)
    }
}
