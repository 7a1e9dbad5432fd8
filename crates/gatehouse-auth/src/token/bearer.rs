//! Bearer credential extraction from the Authorization header.

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;

/// Extract the bearer token from the `Authorization` header.
///
/// The scheme match is case-insensitive and whitespace around the token
/// is tolerated. Anything that is not a bearer credential, including
/// other schemes and empty values, resolves to `None` rather than an
/// error.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();

    let (scheme, rest) = trimmed.split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = rest.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_plain_bearer() {
        assert_eq!(
            bearer_token(&headers("Bearer mytoken")),
            Some("mytoken".to_string())
        );
    }

    #[test]
    fn test_case_and_spacing_tolerated() {
        assert_eq!(
            bearer_token(&headers("bearer   mytoken  ")),
            Some("mytoken".to_string())
        );
        assert_eq!(
            bearer_token(&headers("BEARER mytoken")),
            Some("mytoken".to_string())
        );
        assert_eq!(
            bearer_token(&headers("  Bearer mytoken")),
            Some("mytoken".to_string())
        );
    }

    #[test]
    fn test_no_credential_cases() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
        assert_eq!(bearer_token(&headers("")), None);
        assert_eq!(bearer_token(&headers("Bearer")), None);
        assert_eq!(bearer_token(&headers("Bearer   ")), None);
        assert_eq!(bearer_token(&headers("Basic xyz")), None);
    }
}
