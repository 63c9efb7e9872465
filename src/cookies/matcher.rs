//! Domain and path matching (RFC 6265 §5.1.3, §5.1.4).
//!
//! The free functions are pure predicates. [`RequestScope`] binds them to one
//! absolute request URL, caching its host and default path.

use crate::base::context::UrlResultExt;
use crate::base::cookieerror::CookieError;
use url::Url;

/// Default cookie path for a request URL string.
///
/// Malformed or non-absolute URLs yield `/`.
pub fn default_path(url: &str) -> String {
    match Url::parse(url) {
        Ok(url) => default_path_of(&url),
        Err(_) => "/".to_string(),
    }
}

/// Default cookie path for a parsed URL: the path up to, not including, its
/// last `/`, or `/` when the path has a single segment.
pub fn default_path_of(url: &Url) -> String {
    let path = url.path();
    if !path.starts_with('/') {
        return "/".to_string();
    }
    match path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(idx) => path[..idx].to_string(),
    }
}

/// Check if request path matches cookie path.
/// Implements RFC 6265 path matching; an empty cookie path matches everything.
pub fn path_matches(cookie_path: &str, request_path: &str) -> bool {
    if cookie_path.is_empty() || request_path == cookie_path {
        return true;
    }

    if request_path.starts_with(cookie_path) {
        // Cookie path is a prefix
        if cookie_path.ends_with('/') {
            return true;
        }
        // Check that the next character in request_path is '/'
        return request_path.as_bytes().get(cookie_path.len()) == Some(&b'/');
    }

    false
}

/// Check if a cookie domain matches the request host.
///
/// Matching is case-insensitive. An empty cookie domain never matches; it
/// must be filled from the request host first. A leading-dot domain strips
/// exactly one label from the host, so `.bar.com` matches `test.bar.com` but
/// not `other.test.bar.com`.
pub fn domain_matches(cookie_domain: &str, request_host: &str) -> bool {
    let cookie_domain = cookie_domain.to_ascii_lowercase();
    let request_host = request_host.to_ascii_lowercase();

    if cookie_domain.is_empty() {
        return false;
    }
    if cookie_domain == request_host {
        return true;
    }

    match cookie_domain.strip_prefix('.') {
        Some(rest) => parent_domain(&request_host) == rest,
        None => false,
    }
}

/// Drop the first label of a multi-label host.
fn parent_domain(host: &str) -> &str {
    match host.split_once('.') {
        Some((_, parent)) if !parent.is_empty() => parent,
        _ => host,
    }
}

/// An absolute request URL that cookies are matched against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestScope {
    url: Url,
    host: Option<String>,
    default_path: String,
}

impl RequestScope {
    pub fn new(url: Url) -> Self {
        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .map(str::to_ascii_lowercase);
        let default_path = default_path_of(&url);
        Self {
            url,
            host,
            default_path,
        }
    }

    /// Parse and bind an absolute URL.
    pub fn parse(url: &str) -> Result<Self, CookieError> {
        Url::parse(url).url_context(url).map(Self::new)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Lower-cased request host, if the URL has one.
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn default_path(&self) -> &str {
        &self.default_path
    }

    pub fn domain_matches(&self, cookie_domain: &str) -> bool {
        self.host
            .as_deref()
            .is_some_and(|host| domain_matches(cookie_domain, host))
    }

    pub fn path_matches(&self, cookie_path: &str) -> bool {
        path_matches(cookie_path, &self.default_path)
    }
}
