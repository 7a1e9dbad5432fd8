//! Session cookie parsing and construction.

use axum::http::header::{COOKIE, InvalidHeaderValue};
use axum::http::{HeaderMap, HeaderValue};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "gatehouse_session";

/// Read the session token from the request's `Cookie` header.
///
/// Returns `None` when the header is missing, the cookie is not present,
/// or its value is empty.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(COOKIE)?.to_str().ok()?;
    for pair in value.split(';') {
        let mut parts = pair.trim().splitn(2, '=');
        let (Some(key), Some(val)) = (parts.next(), parts.next()) else {
            continue;
        };
        if key.trim() == SESSION_COOKIE {
            let val = val.trim();
            if !val.is_empty() {
                return Some(val.to_string());
            }
        }
    }
    None
}

/// Build the `Set-Cookie` value that installs a session cookie.
///
/// `HttpOnly`, `SameSite=Lax`, and path `/` are fixed policy; `Secure`
/// is appended unless disabled for plain-HTTP development.
pub fn build_session_cookie(
    token: &str,
    max_age_seconds: i64,
    secure: bool,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_seconds}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Build the `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie(secure: bool) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}
