use cookiejar::base::clock::{Clock, ManualClock};
use cookiejar::cookies::canonical_cookie::{CookieAttribute, CookieAttributes};
use cookiejar::cookies::cookiedate::format_http_date;
use cookiejar::cookies::jar::CookieJar;
use http::header::{HeaderMap, HeaderValue, SET_COOKIE};
use std::sync::Arc;
use time::{Duration, OffsetDateTime};

const HTTP_STR: &str = "rememberme=1; domain=foo.com; path=/; ssid=Hy1t5e#oj21.876aak;";
const BASE_URL: &str = "http://bar.com/";

fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap(),
    ))
}

fn jar(header: &str, url: Option<&str>, clock: &Arc<ManualClock>) -> CookieJar {
    let mut builder = CookieJar::builder()
        .header(header)
        .clock(Arc::clone(clock) as Arc<dyn Clock>);
    if let Some(url) = url {
        builder = builder.url(url);
    }
    builder.build().unwrap()
}

#[test]
fn test_empty_header_with_url() {
    let jar = jar("", Some(BASE_URL), &clock());
    assert!(jar.is_empty());
    assert_eq!(jar.url().map(|u| u.as_str()), Some(BASE_URL));
}

#[test]
fn test_binding_fills_missing_attributes() {
    let jar = jar(HTTP_STR, Some(BASE_URL), &clock());
    assert_eq!(jar.len(), 2);

    let ssid = &jar.cookies()[1];
    assert_eq!(ssid.domain(), Some("bar.com"));
    assert_eq!(ssid.path(), Some("/"));
    assert!(ssid.host_only());

    let rememberme = &jar.cookies()[0];
    assert_eq!(rememberme.domain(), Some("foo.com"));
    assert!(!rememberme.host_only());
}

#[test]
fn test_get() {
    let jar = jar(HTTP_STR, Some(BASE_URL), &clock());
    assert_eq!(jar.get("rememberme").unwrap().value(), "1");
    assert_eq!(jar.get("ssid").unwrap().value(), "Hy1t5e#oj21.876aak");
    assert!(jar.get("not-exists").is_none());
}

#[test]
fn test_set_adds_new_cookie() {
    let mut jar = jar(HTTP_STR, Some(BASE_URL), &clock());
    jar.set("x-new", "value", CookieAttributes::default()).unwrap();
    assert_eq!(jar.len(), 3);
}

#[test]
fn test_set_replaces_same_name() {
    let mut jar = jar(HTTP_STR, Some(BASE_URL), &clock());
    jar.set("rememberme", "0", CookieAttributes::default()).unwrap();
    assert_eq!(jar.len(), 2);
    assert_eq!(jar.cookies()[1].name(), "rememberme");
    assert_eq!(jar.cookies()[1].value(), "0");
}

#[test]
fn test_set_rejects_invalid_value() {
    let mut jar = jar(HTTP_STR, Some(BASE_URL), &clock());
    assert!(jar.set("bad", "\u{0}", CookieAttributes::default()).is_err());
    assert_eq!(jar.len(), 2);
}

#[test]
fn test_filter_removes_foreign_domain() {
    let mut jar = jar(HTTP_STR, Some(BASE_URL), &clock());
    let removed = jar.filter();

    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].name(), "rememberme");
    assert_eq!(jar.len(), 1);

    let ssid = jar.get("ssid").unwrap();
    assert_eq!(ssid.domain(), Some("bar.com"));
    assert!(ssid.host_only());
    assert_eq!(ssid.path(), Some("/"));
}

#[test]
fn test_filter_removes_path_mismatch_in_order() {
    let mut jar = jar(
        "a=1; path=/admin; b=2; path=/; c=3; path=/api/v1",
        Some("http://bar.com/api/v1/users"),
        &clock(),
    );
    let removed = jar.filter();

    let removed: Vec<&str> = removed.iter().map(|c| c.name()).collect();
    assert_eq!(removed, vec!["a"]);
    let kept: Vec<&str> = jar.iter().map(|c| c.name()).collect();
    assert_eq!(kept, vec!["b", "c"]);
}

#[test]
fn test_filter_without_url_is_noop() {
    let mut jar = jar(HTTP_STR, None, &clock());
    assert!(jar.filter().is_empty());
    assert_eq!(jar.len(), 2);
    assert_eq!(jar.cookies()[1].domain(), None);
}

#[test]
fn test_filter_completes_cookies_added_after_binding() {
    let mut jar = jar("", Some(BASE_URL), &clock());
    jar.set("late", "1", CookieAttributes::default()).unwrap();
    assert_eq!(jar.get("late").unwrap().domain(), None);

    assert!(jar.filter().is_empty());
    let late = jar.get("late").unwrap();
    assert_eq!(late.domain(), Some("bar.com"));
    assert!(late.host_only());
}

#[test]
fn test_clear_expired_keeps_unexpired() {
    let mut jar = jar(HTTP_STR, Some(BASE_URL), &clock());
    let removed = jar.clear_expired();
    assert!(removed.is_empty());
    assert_eq!(jar.len(), 2);
}

#[test]
fn test_clear_expired_by_expires() {
    let clock = clock();
    let past = format_http_date(clock.now() - Duration::milliseconds(100));
    let header = format!("{HTTP_STR} expires={past}");
    let mut jar = jar(&header, Some(BASE_URL), &clock);

    let removed = jar.clear_expired();
    assert_eq!(jar.len(), 1);
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].name(), "ssid");
}

#[test]
fn test_clear_expired_by_max_age() {
    let clock = clock();
    let header = format!("{HTTP_STR} max-age=1");
    let mut jar = jar(&header, Some(BASE_URL), &clock);

    assert!(jar.clear_expired().is_empty());

    clock.advance(Duration::milliseconds(1200));
    let removed = jar.clear_expired();
    assert_eq!(jar.len(), 1);
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].name(), "ssid");
}

#[test]
fn test_clear_expired_partitions() {
    let clock = clock();
    let now = clock.now();
    let mut jar = jar(
        "a=1; max-age=10; b=2; c=3; max-age=0; d=4; max-age=30; e=5; max-age=20",
        None,
        &clock,
    );
    let original = jar.len();
    let at = now + Duration::seconds(20);

    let removed = jar.clear_expired_at(at);

    assert_eq!(removed.len() + jar.len(), original);
    assert!(removed.iter().all(|c| c.expiration_time() <= at));
    assert!(jar.iter().all(|c| c.expiration_time() > at));
    let removed: Vec<&str> = removed.iter().map(|c| c.name()).collect();
    assert_eq!(removed, vec!["a", "c", "e"]);
    let kept: Vec<&str> = jar.iter().map(|c| c.name()).collect();
    assert_eq!(kept, vec!["b", "d"]);
}

#[test]
fn test_merge_into_empty_jar() {
    let clock = clock();
    let mut old = jar("", Some(BASE_URL), &clock);
    let new = jar(HTTP_STR, Some(BASE_URL), &clock);
    old.merge(&new, &[]);
    assert_eq!(old.len(), 2);
}

#[test]
fn test_merge_two_empty_jars() {
    let clock = clock();
    let mut old = jar("", Some(BASE_URL), &clock);
    old.merge(&jar("", Some(BASE_URL), &clock), &[]);
    assert!(old.is_empty());
}

#[test]
fn test_merge_empty_incoming_is_noop() {
    let clock = clock();
    let mut old = jar(HTTP_STR, Some(BASE_URL), &clock);
    let before = old.cookies().to_vec();
    old.merge(&jar("", Some(BASE_URL), &clock), &[]);
    assert_eq!(old.cookies(), before.as_slice());
}

#[test]
fn test_merge_different_cookies() {
    let clock = clock();
    let mut old = jar(HTTP_STR, Some(BASE_URL), &clock);
    old.merge(&jar("test=value", Some(BASE_URL), &clock), &[]);
    assert_eq!(old.len(), 3);
    assert_eq!(old.cookies()[2].name(), "test");
}

#[test]
fn test_merge_same_cookie_keeps_creation_time() {
    let clock = clock();
    let mut past = jar(HTTP_STR, Some(BASE_URL), &clock);
    let created = past.cookies()[1].creation_time();
    let last_access = past.cookies()[1].last_access_time();

    clock.advance(Duration::seconds(1));
    past.merge(&jar("ssid=abc", Some(BASE_URL), &clock), &[]);

    assert_eq!(past.len(), 2);
    let ssid = &past.cookies()[1];
    assert_eq!(ssid.name(), "ssid");
    assert_eq!(ssid.value(), "abc");
    assert_eq!(ssid.creation_time(), created);
    assert_ne!(ssid.last_access_time(), last_access);
    assert!(ssid.last_access_time() > last_access);
}

#[test]
fn test_merge_leaves_other_scope_untouched() {
    let clock = clock();
    let mut old = jar("sid=old; domain=foo.com; path=/", Some(BASE_URL), &clock);
    old.merge(&jar("sid=new", Some(BASE_URL), &clock), &[]);

    let values: Vec<(&str, Option<&str>)> = old.iter().map(|c| (c.value(), c.domain())).collect();
    assert_eq!(
        values,
        vec![("old", Some("foo.com")), ("new", Some("bar.com"))]
    );
}

#[test]
fn test_merge_from_unbound_jar_never_replaces() {
    let clock = clock();
    let mut old = jar("sid=old", Some(BASE_URL), &clock);
    old.merge(&jar("sid=new", None, &clock), &[]);
    assert_eq!(old.len(), 2);
    assert_eq!(old.cookies()[0].value(), "old");
}

#[test]
fn test_merge_blank_value_deletes() {
    let clock = clock();
    let mut old = jar(HTTP_STR, Some(BASE_URL), &clock);
    old.merge(&jar("ssid=;  gone=  ", Some(BASE_URL), &clock), &[]);

    let names: Vec<&str> = old.iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["rememberme"]);
}

#[test]
fn test_merge_blank_values_into_empty_jar_are_dropped() {
    let clock = clock();
    let mut old = jar("", Some(BASE_URL), &clock);
    old.merge(&jar("a=; b=1", Some(BASE_URL), &clock), &[]);
    let names: Vec<&str> = old.iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["b"]);
}

#[test]
fn test_merge_copies_requested_attributes() {
    let clock = clock();
    let mut old = jar("ssid=1; secure; httponly", Some(BASE_URL), &clock);
    let created = old.cookies()[0].creation_time();
    let last_access = old.cookies()[0].last_access_time();

    clock.advance(Duration::seconds(5));
    old.merge(
        &jar("ssid=2", Some(BASE_URL), &clock),
        &[CookieAttribute::Secure, CookieAttribute::LastAccess],
    );

    let ssid = old.get("ssid").unwrap();
    assert_eq!(ssid.value(), "2");
    assert!(ssid.secure());
    assert!(!ssid.http_only());
    assert_eq!(ssid.creation_time(), created);
    assert_eq!(ssid.last_access_time(), last_access);
}

#[test]
fn test_merge_first_name_match_wins() {
    let clock = clock();
    let mut old = jar("a=old", Some(BASE_URL), &clock);
    old.merge(&jar("a=first; a=second", Some(BASE_URL), &clock), &[]);

    let values: Vec<&str> = old.iter().map(|c| c.value()).collect();
    assert_eq!(values, vec!["first", "second"]);
}

#[test]
fn test_merge_blank_value_deletes_every_covered_duplicate() {
    let clock = clock();
    let mut old = jar("a=1; path=/; a=2; path=/", Some(BASE_URL), &clock);
    assert_eq!(old.len(), 2);

    old.merge(&jar("a=", Some(BASE_URL), &clock), &[]);
    assert!(old.is_empty());
}

#[test]
fn test_merge_replaces_every_covered_duplicate() {
    let clock = clock();
    let mut old = jar("a=1; path=/; b=x; a=2; path=/", Some(BASE_URL), &clock);
    let created = old.cookies()[0].creation_time();

    clock.advance(Duration::seconds(1));
    old.merge(&jar("a=new", Some(BASE_URL), &clock), &[]);

    let values: Vec<(&str, &str)> = old.iter().map(|c| (c.name(), c.value())).collect();
    assert_eq!(values, vec![("a", "new"), ("b", "x")]);
    assert_eq!(old.cookies()[0].creation_time(), created);
}

#[test]
fn test_merge_copied_max_age_restarts_from_incoming() {
    let clock = clock();
    let mut old = jar("a=1; max-age=60", Some(BASE_URL), &clock);

    clock.advance(Duration::seconds(120));
    assert!(old.cookies()[0].is_expired(clock.now()));
    old.merge(
        &jar("a=2", Some(BASE_URL), &clock),
        &[CookieAttribute::MaxAge],
    );

    let a = old.get("a").unwrap();
    assert_eq!(a.value(), "2");
    assert_eq!(a.max_age(), Some(60));
    assert!(a.is_persistent());
    assert_eq!(a.expiration_time(), clock.now() + Duration::seconds(60));
    assert!(!a.is_expired(clock.now()));
}

#[test]
fn test_to_header_string() {
    let jar = jar(HTTP_STR, None, &clock());
    let c0 = jar.cookies()[0].to_header();
    let c1 = jar.cookies()[1].to_header();

    assert_eq!(jar.to_header_string(false), format!("{c0}; {c1}"));
    assert_eq!(
        jar.to_header_string(true),
        "rememberme=1; ssid=Hy1t5e#oj21.876aak"
    );
}

#[test]
fn test_request_header_value() {
    assert!(CookieJar::new().request_header_value().is_none());

    let jar = jar(HTTP_STR, Some(BASE_URL), &clock());
    let value = jar.request_header_value().unwrap();
    assert_eq!(value.to_str().unwrap(), "rememberme=1; ssid=Hy1t5e#oj21.876aak");
}

#[test]
fn test_from_response_headers() {
    let mut headers = HeaderMap::new();
    headers.append(SET_COOKIE, HeaderValue::from_static("sid=abc; Path=/; HttpOnly"));
    headers.append(SET_COOKIE, HeaderValue::from_static("Max-Age=10"));
    headers.append(SET_COOKIE, HeaderValue::from_bytes(b"bin=\xff").unwrap());
    headers.append(SET_COOKIE, HeaderValue::from_static("theme=dark; Max-Age=60"));

    let jar =
        CookieJar::from_response_headers(&headers, "https://bar.com/app/x", clock()).unwrap();

    let names: Vec<&str> = jar.iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["sid", "theme"]);
    assert!(jar.get("sid").unwrap().http_only());
    assert!(!jar.get("sid").unwrap().is_persistent());
    assert_eq!(jar.get("theme").unwrap().path(), Some("/app"));
    assert_eq!(jar.get("theme").unwrap().domain(), Some("bar.com"));
}

#[test]
fn test_store_response_updates_jar() {
    let clock = clock();
    let mut stored = jar("ssid=old; theme=light", Some(BASE_URL), &clock);
    let created = stored.get("ssid").unwrap().creation_time();

    clock.advance(Duration::minutes(1));
    let mut headers = HeaderMap::new();
    headers.append(SET_COOKIE, HeaderValue::from_static("ssid=new"));
    headers.append(SET_COOKIE, HeaderValue::from_static("theme=; Max-Age=0"));
    stored.store_response(BASE_URL, &headers).unwrap();

    assert_eq!(stored.to_header_string(true), "ssid=new");
    assert_eq!(stored.get("ssid").unwrap().creation_time(), created);
}

#[test]
fn test_store_response_rejects_relative_url() {
    let mut stored = CookieJar::new();
    assert!(stored.store_response("bar.com", &HeaderMap::new()).is_err());
}
