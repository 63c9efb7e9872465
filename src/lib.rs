//! # cookiejar
//!
//! A client-side HTTP cookie jar for Rust, following RFC 6265.
//!
//! `cookiejar` parses raw cookie headers into validated records, fills in the
//! attributes a server omitted, decides which cookies apply to a request URL,
//! and merges a response's cookies into a stored jar.
//!
//! ## Features
//!
//! - **Parsing**: `Cookie` / `Set-Cookie` text with percent-decoding
//! - **Matching**: RFC 6265 domain-match and path-match
//! - **Expiry**: `max-age` over `expires`, session vs persistent cookies
//! - **Merge**: updates keep the original creation time; blank values delete
//! - **Deterministic time**: every timestamp comes from an injectable clock
//!
//! ## Quick Start
//!
//! ```rust
//! use cookiejar::cookies::jar::CookieJar;
//!
//! let mut jar = CookieJar::builder()
//!     .header("rememberme=1; domain=foo.com; path=/; ssid=Hy1t5e#oj21.876aak;")
//!     .url("http://bar.com/")
//!     .build()?;
//!
//! let removed = jar.filter();
//! assert_eq!(removed[0].name(), "rememberme");
//! assert_eq!(jar.to_header_string(true), "ssid=Hy1t5e#oj21.876aak");
//! # Ok::<(), cookiejar::base::cookieerror::CookieError>(())
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Errors, clocks and error context helpers
//! - [`cookies`] - Cookie records, parsing, matching and the jar

pub mod base;
pub mod cookies;
