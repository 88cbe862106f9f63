//! The `token` session cookie.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;

/// Name of the cookie carrying the JWT.
pub const AUTH_COOKIE: &str = "token";

/// `Set-Cookie` value that stores `token` for `max_age_secs`.
pub fn auth_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{AUTH_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age_secs}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that expires the session cookie immediately.
pub fn clear_auth_cookie(secure: bool) -> String {
    auth_cookie("", 0, secure)
}

/// Value of the cookie `name` from the request's `Cookie` headers.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn builds_cookie_attributes() {
        let c = auth_cookie("abc", 3600, false);
        assert_eq!(c, "token=abc; HttpOnly; SameSite=Lax; Path=/; Max-Age=3600");
        assert!(auth_cookie("abc", 3600, true).ends_with("; Secure"));
        assert!(clear_auth_cookie(false).contains("Max-Age=0"));
    }

    #[test]
    fn reads_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; token=jwt.value.here"));
        assert_eq!(read_cookie(&headers, "token").as_deref(), Some("jwt.value.here"));
        assert_eq!(read_cookie(&headers, "missing"), None);
    }

    #[test]
    fn empty_cookie_is_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("token="));
        assert_eq!(read_cookie(&headers, "token"), None);
    }
}
