//! The `auth_token` session cookie.

use axum::http::{HeaderMap, HeaderValue, header::COOKIE};
use babyshop_client::guard::AUTH_COOKIE;

/// Session cookie lifetime (30 days), matching the backend token lifetime.
const MAX_AGE_SECS: u64 = 30 * 24 * 60 * 60;

/// Value of the `auth_token` cookie, if the request carries a non-empty one.
#[must_use]
pub fn auth_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == AUTH_COOKIE)
        .map(|(_, value)| value.trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value storing `token`.
///
/// Returns `None` if the token contains characters not allowed in a header.
#[must_use]
pub fn session_cookie(token: &str, secure: bool) -> Option<HeaderValue> {
    let secure = if secure { "; Secure" } else { "" };
    HeaderValue::from_str(&format!(
        "{AUTH_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={MAX_AGE_SECS}{secure}"
    ))
    .ok()
}

/// `Set-Cookie` value that removes the session cookie.
#[must_use]
pub fn expired_session_cookie() -> HeaderValue {
    HeaderValue::from_static("auth_token=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn headers(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn test_auth_token_among_other_cookies() {
        let headers = headers("theme=dark; auth_token=abc.def.ghi; cart=3");
        assert_eq!(auth_token(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_missing_or_empty_token() {
        assert_eq!(auth_token(&HeaderMap::new()), None);
        assert_eq!(auth_token(&headers("auth_token=")), None);
        assert_eq!(auth_token(&headers("auth_token_old=x")), None);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("tok", true).unwrap();
        let cookie = cookie.to_str().unwrap();
        assert!(cookie.starts_with("auth_token=tok;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.ends_with("; Secure"));

        let plain = session_cookie("tok", false).unwrap();
        assert!(!plain.to_str().unwrap().contains("Secure"));
    }

    #[test]
    fn test_expired_cookie_clears() {
        assert!(expired_session_cookie().to_str().unwrap().contains("Max-Age=0"));
    }
}
