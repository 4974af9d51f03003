use std::sync::LazyLock;

/// Name of the HttpOnly cookie holding the opaque session credential
pub static GK_SESSION_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    std::env::var("GK_SESSION_COOKIE_NAME").unwrap_or_else(|_| "sb-auth-token".to_string())
});

/// Max-Age of the session cookie in seconds.
///
/// Must outlive the access token so refresh can still happen; the provider
/// invalidates the credential itself long before this runs out.
pub static GK_SESSION_COOKIE_MAX_AGE: LazyLock<u64> = LazyLock::new(|| {
    std::env::var("GK_SESSION_COOKIE_MAX_AGE")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(604800) // Default to 7 days if not set or invalid
});

/// Name of the readable anti-forgery cookie mirrored by callers
pub static GK_CSRF_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    std::env::var("GK_CSRF_COOKIE_NAME").unwrap_or_else(|_| "csrf-token".to_string())
});
