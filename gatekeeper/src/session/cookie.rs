use std::collections::HashMap;

use http::header::{COOKIE, HeaderMap, SET_COOKIE};

use super::config::{GK_CSRF_COOKIE_NAME, GK_SESSION_COOKIE_MAX_AGE, GK_SESSION_COOKIE_NAME};
use super::errors::SessionError;
use crate::config::GK_COOKIE_SECURE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Attributes attached to a queued Set-Cookie value.
#[derive(Debug, Clone)]
pub struct CookieAttributes {
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSite,
    pub path: &'static str,
    /// None omits Max-Age, leaving a session-scoped cookie.
    pub max_age: Option<i64>,
}

impl CookieAttributes {
    /// Attributes of the session-credential cookie.
    pub fn session() -> Self {
        Self {
            http_only: true,
            secure: *GK_COOKIE_SECURE,
            same_site: SameSite::Lax,
            path: "/",
            max_age: Some(*GK_SESSION_COOKIE_MAX_AGE as i64),
        }
    }

    /// Attributes of the anti-forgery cookie. Callers must be able to read it,
    /// so it is never HttpOnly.
    pub fn csrf() -> Self {
        Self {
            http_only: false,
            secure: *GK_COOKIE_SECURE,
            same_site: SameSite::Strict,
            path: "/",
            max_age: None,
        }
    }
}

/// Cookie capability handed to anything that needs cookie access during a
/// request: reads come from the inbound `Cookie` header, writes accumulate
/// as `Set-Cookie` values to be flushed onto the outgoing response.
#[derive(Debug)]
pub struct CookieCarrier {
    request: HashMap<String, String>,
    queued: HeaderMap,
}

impl CookieCarrier {
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, SessionError> {
        let mut request = HashMap::new();

        if let Some(cookie_header) = headers.get(COOKIE) {
            let cookie_str = cookie_header.to_str().map_err(|e| {
                tracing::error!("Invalid cookie header: {}", e);
                SessionError::Header("Invalid cookie header".to_string())
            })?;

            for pair in cookie_str.split(';') {
                let mut parts = pair.trim().splitn(2, '=');
                if let (Some(k), Some(v)) = (parts.next(), parts.next()) {
                    request.insert(k.to_string(), v.to_string());
                }
            }
        }

        Ok(Self {
            request,
            queued: HeaderMap::new(),
        })
    }

    pub fn read(&self, name: &str) -> Option<&str> {
        self.request.get(name).map(|s| s.as_str())
    }

    pub fn session_cookie(&self) -> Option<&str> {
        self.read(GK_SESSION_COOKIE_NAME.as_str())
    }

    pub fn csrf_cookie(&self) -> Option<&str> {
        self.read(GK_CSRF_COOKIE_NAME.as_str())
    }

    pub fn write(
        &mut self,
        name: &str,
        value: &str,
        attrs: &CookieAttributes,
    ) -> Result<(), SessionError> {
        let cookie = render_cookie(name, value, attrs, false);
        self.queue(cookie)
    }

    /// Expire a cookie on the client: empty value, Max-Age=0 and a past Expires.
    pub fn clear(&mut self, name: &str, attrs: &CookieAttributes) -> Result<(), SessionError> {
        let cookie = render_cookie(name, "", attrs, true);
        self.queue(cookie)
    }

    fn queue(&mut self, cookie: String) -> Result<(), SessionError> {
        tracing::debug!("Queueing cookie: {}", cookie);
        self.queued.append(
            SET_COOKIE,
            cookie
                .parse()
                .map_err(|_| SessionError::Cookie("Failed to parse cookie".to_string()))?,
        );
        Ok(())
    }

    pub fn queued_headers(&self) -> &HeaderMap {
        &self.queued
    }

    /// Consume the carrier, yielding the accumulated Set-Cookie headers.
    pub fn into_headers(self) -> HeaderMap {
        self.queued
    }
}

fn render_cookie(name: &str, value: &str, attrs: &CookieAttributes, expire: bool) -> String {
    let mut cookie = format!(
        "{name}={value}; SameSite={}; Path={}",
        attrs.same_site.as_str(),
        attrs.path
    );
    if expire {
        cookie.push_str("; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT");
    } else if let Some(max_age) = attrs.max_age {
        cookie.push_str(&format!("; Max-Age={max_age}"));
    }
    if attrs.secure {
        cookie.push_str("; Secure");
    }
    if attrs.http_only {
        cookie.push_str("; HttpOnly");
    }
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::HeaderValue;

    fn attrs() -> CookieAttributes {
        CookieAttributes {
            http_only: true,
            secure: true,
            same_site: SameSite::Lax,
            path: "/",
            max_age: Some(3600),
        }
    }

    #[test]
    fn test_from_headers_parses_cookie_pairs() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("a=1; sb-auth-token=opaque-value; b=2"),
        );

        let carrier = CookieCarrier::from_headers(&headers).expect("valid cookie header");
        assert_eq!(carrier.read("a"), Some("1"));
        assert_eq!(carrier.read("sb-auth-token"), Some("opaque-value"));
        assert_eq!(carrier.read("missing"), None);
    }

    #[test]
    fn test_from_headers_without_cookie_header() {
        let carrier = CookieCarrier::from_headers(&HeaderMap::new()).expect("no cookie header");
        assert_eq!(carrier.read("anything"), None);
    }

    #[test]
    fn test_write_renders_all_attributes() {
        let cookie = render_cookie("name", "value", &attrs(), false);
        assert_eq!(
            cookie,
            "name=value; SameSite=Lax; Path=/; Max-Age=3600; Secure; HttpOnly"
        );
    }

    #[test]
    fn test_write_omits_max_age_when_unset() {
        let mut a = attrs();
        a.max_age = None;
        a.secure = false;
        a.http_only = false;
        let cookie = render_cookie("csrf-token", "abc", &a, false);
        assert_eq!(cookie, "csrf-token=abc; SameSite=Lax; Path=/");
    }

    #[test]
    fn test_clear_expires_cookie() {
        let cookie = render_cookie("name", "", &attrs(), true);
        assert!(cookie.starts_with("name=; "));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"));
    }

    #[test]
    fn test_write_queues_set_cookie_header() {
        let mut carrier = CookieCarrier::from_headers(&HeaderMap::new()).expect("empty headers");
        carrier
            .write("name", "value", &attrs())
            .expect("valid cookie");

        let queued: Vec<_> = carrier.queued_headers().get_all(SET_COOKIE).iter().collect();
        assert_eq!(queued.len(), 1);
        assert!(queued[0].to_str().unwrap().starts_with("name=value; "));
    }

    #[test]
    fn test_csrf_attributes_are_readable_and_strict() {
        let attrs = CookieAttributes::csrf();
        assert!(!attrs.http_only);
        assert_eq!(attrs.same_site, SameSite::Strict);
        assert_eq!(attrs.path, "/");
    }

    #[test]
    fn test_session_attributes_are_http_only_and_lax() {
        let attrs = CookieAttributes::session();
        assert!(attrs.http_only);
        assert_eq!(attrs.same_site, SameSite::Lax);
        assert_eq!(attrs.path, "/");
        assert!(attrs.max_age.is_some());
    }
}
