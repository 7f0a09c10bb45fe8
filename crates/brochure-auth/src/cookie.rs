//! Session cookie handling.

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session";

/// Attributes shared by the set and clear forms of the session cookie.
const COOKIE_ATTRIBUTES: &str = "HttpOnly; Secure; SameSite=Strict; Path=/";

/// Find a cookie's value in a `Cookie` request header.
///
/// The header is a `;`-separated list of `name=value` pairs. Each pair is
/// split on its first `=` only, so values may contain `=` (base64 padding).
/// Pairs without `=` are ignored. If a name repeats, the last value wins.
#[must_use]
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .filter(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim())
        .last()
}

/// `Set-Cookie` value carrying a session token.
#[must_use]
pub fn session_cookie(token: &str, max_age_secs: u64) -> String {
    format!("{SESSION_COOKIE}={token}; {COOKIE_ATTRIBUTES}; Max-Age={max_age_secs}")
}

/// `Set-Cookie` value that overwrites the session with an expired blank.
#[must_use]
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; {COOKIE_ATTRIBUTES}; Expires=Thu, 01 Jan 1970 00:00:00 GMT")
}
