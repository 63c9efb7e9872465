//! HTTP date handling for the cookie `expires` attribute.
//!
//! Dates are rendered in the RFC 1123 form used by `Set-Cookie`
//! (`Sun, 06 Nov 1994 08:49:37 GMT`). Parsing goes through the `cookie`
//! crate and accepts the usual RFC 850, Netscape and asctime variants.

use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// RFC 1123 rendering of the Unix epoch.
pub const EPOCH_HTTP_DATE: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

/// Render `at` as an RFC 1123 date in GMT.
///
/// Instants before the Unix epoch render as the epoch.
pub fn format_http_date(at: OffsetDateTime) -> String {
    let format = format_description!(
        "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
    );
    let at = at.max(OffsetDateTime::UNIX_EPOCH).to_offset(UtcOffset::UTC);
    at.format(&format)
        .unwrap_or_else(|_| EPOCH_HTTP_DATE.to_string())
}

/// Parse an HTTP date, returning `None` when no known form matches.
///
/// Dates are read by the `cookie` crate's `Expires` parser, which covers
/// RFC 1123, RFC 850 with two-digit years, the dashed Netscape form and
/// asctime. RFC 850 with a full weekday and a four-digit year is accepted on
/// top of that.
pub fn parse_http_date(input: &str) -> Option<OffsetDateTime> {
    let input = input.trim();
    if input.is_empty() || input.contains(';') {
        return None;
    }

    cookie::Cookie::parse(format!("x=y; Expires={input}"))
        .ok()
        .and_then(|c| c.expires_datetime())
        .or_else(|| parse_rfc850_full_year(input))
}

fn parse_rfc850_full_year(input: &str) -> Option<OffsetDateTime> {
    let format = format_description!(
        "[weekday repr:long], [day]-[month repr:short]-[year] [hour]:[minute]:[second] GMT"
    );
    PrimitiveDateTime::parse(input, &format)
        .ok()
        .map(PrimitiveDateTime::assume_utc)
}

/// Parse an `expires` attribute value.
///
/// Unparseable dates collapse to the Unix epoch, so the cookie is already
/// expired rather than rejected.
pub fn parse_expires(input: &str) -> OffsetDateTime {
    match parse_http_date(input) {
        Some(at) => at,
        None => {
            tracing::debug!(value = %input, "unparseable cookie expires, using epoch");
            OffsetDateTime::UNIX_EPOCH
        }
    }
}
