//! Cookie parsing, matching and jar management.
//!
//! This module provides a client-side cookie jar following RFC 6265:
//!
//! - **Records**: a single validated cookie ([`CanonicalCookie`](canonical_cookie::CanonicalCookie))
//! - **Parsing**: raw `Cookie` / `Set-Cookie` text into records ([`parser`])
//! - **Matching**: domain and path matching against a request URL ([`matcher`])
//! - **Jar**: completion, filtering, expiry and merge ([`CookieJar`](jar::CookieJar))
//! - **Dates**: RFC 1123 `expires` rendering and parsing ([`cookiedate`])
//!
//! # Architecture
//!
//! | Chromium (C++) | cookiejar (Rust) | Responsibility |
//! |----------------|------------------|----------------|
//! | `net::CanonicalCookie` | [`CanonicalCookie`](canonical_cookie::CanonicalCookie) | Single cookie representation |
//! | `net::ParsedCookie` | [`parser`] | Header tokenizing |
//! | `net::cookie_util` | [`matcher`] | Domain/path matching, default path |
//! | `net::CookieMonster` | [`CookieJar`](jar::CookieJar) | Cookie collection |
//!
//! # Applying a response
//!
//! ```rust
//! use cookiejar::cookies::jar::CookieJar;
//! use http::header::{HeaderMap, HeaderValue, SET_COOKIE};
//!
//! let mut jar = CookieJar::builder()
//!     .header("ssid=old")
//!     .url("http://bar.com/")
//!     .build()?;
//!
//! let mut headers = HeaderMap::new();
//! headers.append(SET_COOKIE, HeaderValue::from_static("ssid=new; path=/"));
//! headers.append(SET_COOKIE, HeaderValue::from_static("theme=dark"));
//! jar.store_response("http://bar.com/", &headers)?;
//!
//! assert_eq!(jar.to_header_string(true), "ssid=new; theme=dark");
//! # Ok::<(), cookiejar::base::cookieerror::CookieError>(())
//! ```
//!
//! # References
//!
//! - RFC 6265 §5.1.3 (domain matching), §5.1.4 (paths and path-match)
//! - RFC 6265 §5.3 (storage model, host-only flag)

pub mod canonical_cookie;
pub mod cookiedate;
pub mod jar;
pub mod matcher;
pub mod parser;
