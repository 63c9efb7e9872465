//! Ergonomic error context helpers.
//!
//! Provides extension traits for adding context to `Result` types,
//! converting URL parser errors into context-rich `CookieError` variants.

use crate::base::cookieerror::CookieError;

/// Extension trait for adding context to URL parsing Results.
pub trait UrlResultExt<T> {
    /// Attach the offending input to a URL parse error.
    ///
    /// # Example
    /// ```
    /// use cookiejar::base::context::UrlResultExt;
    /// use url::Url;
    ///
    /// let err = Url::parse("bar.com/").url_context("bar.com/").unwrap_err();
    /// assert!(err.to_string().contains("bar.com/"));
    /// ```
    fn url_context(self, url: &str) -> Result<T, CookieError>;
}

impl<T> UrlResultExt<T> for Result<T, url::ParseError> {
    fn url_context(self, url: &str) -> Result<T, CookieError> {
        self.map_err(|e| CookieError::invalid_url(url, e.to_string()))
    }
}
