//! Central configuration for the csrf_newbie crate

use std::sync::LazyLock;

/// Name of the cookie carrying the opaque session id
/// Default: "csrf_newbie_sessionid"
pub static SESSION_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    std::env::var("SESSION_COOKIE_NAME")
        .ok()
        .unwrap_or("csrf_newbie_sessionid".to_string())
});

/// Session lifetime in seconds
pub static SESSION_COOKIE_MAX_AGE: LazyLock<u64> = LazyLock::new(|| {
    parse_max_age(std::env::var("SESSION_COOKIE_MAX_AGE").ok().as_deref())
});

/// Name of the client-readable cookie mirroring the session's CSRF token
/// Default: "csrf_newbie_token"
pub static CSRF_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    std::env::var("CSRF_COOKIE_NAME")
        .ok()
        .unwrap_or("csrf_newbie_token".to_string())
});

/// Request header accepted as an alternate carrier of the CSRF token
/// Default: "x-csrf-newbie-token"
pub static CSRF_HEADER_NAME: LazyLock<String> = LazyLock::new(|| {
    std::env::var("CSRF_HEADER_NAME")
        .ok()
        .unwrap_or("x-csrf-newbie-token".to_string())
});

/// Whether cookies carry the `Secure` attribute
pub static COOKIE_SECURE: LazyLock<bool> =
    LazyLock::new(|| parse_bool(std::env::var("COOKIE_SECURE").ok().as_deref(), true));

/// Form field holding the CSRF token on mutating requests
pub const CSRF_FORM_FIELD: &str = "csrf_token";

const DEFAULT_SESSION_MAX_AGE: u64 = 86400;

/// Upper bound for the session lifetime; browsers cap cookie `Max-Age` at 400 days
pub const MAX_SESSION_MAX_AGE: u64 = 400 * 24 * 60 * 60;

fn parse_max_age(value: Option<&str>) -> u64 {
    value
        .and_then(|s| s.parse::<u64>().ok())
        .map(|max_age| max_age.min(MAX_SESSION_MAX_AGE))
        .unwrap_or(DEFAULT_SESSION_MAX_AGE)
}

fn parse_bool(value: Option<&str>, default: bool) -> bool {
    value
        .map(|val| val.to_lowercase() != "false")
        .unwrap_or(default)
}
