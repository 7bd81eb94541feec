//! Cookie header parsing for the authorizer.
//!
//! Gateways forward headers as a plain name → value map whose key casing is not
//! normalised, so the cookie header is looked up case-insensitively.

use std::collections::HashMap;

pub type CookieMap = HashMap<String, String>;

/// Finds the raw cookie header.
///
/// Exact `cookie` wins, then `Cookie`, then `COOKIE`, then any other casing.
pub fn find_cookie_header(headers: &HashMap<String, String>) -> Option<&str> {
    ["cookie", "Cookie", "COOKIE"]
        .iter()
        .find_map(|name| headers.get(*name))
        .or_else(|| {
            headers
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case("cookie"))
                .map(|(_, value)| value)
        })
        .map(String::as_str)
        .filter(|value| !value.is_empty())
}

/// Parses the request's cookie header. `None` when there is no cookie header.
pub fn parse_cookies(headers: &HashMap<String, String>) -> Option<CookieMap> {
    find_cookie_header(headers).map(parse_cookie_header)
}

/// Parses a `name=value; name2=value2` header value.
///
/// Never fails: a segment without `=` maps to an empty value, and the last
/// occurrence of a name wins.
pub fn parse_cookie_header(raw: &str) -> CookieMap {
    let mut cookies = CookieMap::new();

    for segment in raw.split(';') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let (name, value) = segment.split_once('=').unwrap_or((segment, ""));
        cookies.insert(name.to_string(), value.to_string());
    }

    cookies
}
