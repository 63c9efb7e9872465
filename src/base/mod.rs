//! Base types and error handling.
//!
//! Provides foundational types shared by the cookie modules:
//! - [`CookieError`](cookieerror::CookieError): construction and URL errors
//! - [`Clock`](clock::Clock): injectable time source
//! - [`UrlResultExt`](context::UrlResultExt): URL error context

pub mod clock;
pub mod context;
pub mod cookieerror;
