use http::Method;
use subtle::ConstantTimeEq;

use crate::session::{CookieAttributes, CookieCarrier, GK_CSRF_COOKIE_NAME, SessionError};
use crate::utils::gen_random_hex;

/// Header carrying the caller-presented anti-forgery token
pub const CSRF_HEADER_NAME: &str = "X-CSRF-Token";

/// Body field carrying the token when no header is present
pub const CSRF_BODY_FIELD: &str = "csrf_token";

const CSRF_TOKEN_BYTES: usize = 32;

/// Safe methods get a fresh token issued.
pub fn issues_csrf_token(method: &Method) -> bool {
    method == Method::GET || method == Method::HEAD
}

/// State-changing methods must present a matching token.
pub fn requires_csrf_token(method: &Method) -> bool {
    method == Method::POST
        || method == Method::PUT
        || method == Method::PATCH
        || method == Method::DELETE
}

/// Issue a fresh anti-forgery token and queue it on the readable CSRF cookie.
///
/// Runs unconditionally on every safe request, overwriting any prior token;
/// callers must re-read the cookie before their next unsafe request.
pub fn issue_csrf_token(cookies: &mut CookieCarrier) -> Result<String, SessionError> {
    let token = gen_random_hex(CSRF_TOKEN_BYTES)?;
    cookies.write(GK_CSRF_COOKIE_NAME.as_str(), &token, &CookieAttributes::csrf())?;
    Ok(token)
}

/// Double-submit check: the cookie-resident token and the caller-presented
/// copy must be byte-equal. Comparison is constant-time.
pub fn verify_csrf_token(
    cookie_token: Option<&str>,
    presented: Option<&str>,
) -> Result<(), SessionError> {
    let cookie_token = cookie_token
        .ok_or_else(|| SessionError::CsrfToken("No CSRF cookie found".to_string()))?;
    let presented =
        presented.ok_or_else(|| SessionError::CsrfToken("No CSRF token found".to_string()))?;

    if bool::from(presented.as_bytes().ct_eq(cookie_token.as_bytes())) {
        Ok(())
    } else {
        tracing::error!(
            "CSRF token mismatch, received: {:?}, expected: {:?}",
            presented,
            cookie_token
        );
        Err(SessionError::CsrfToken("CSRF token mismatch".to_string()))
    }
}
