//! Central configuration for the gatekeeper crate

use std::sync::LazyLock;

/// Path of the login page
/// Default: "/login"
pub static GK_LOGIN_PATH: LazyLock<String> =
    LazyLock::new(|| std::env::var("GK_LOGIN_PATH").unwrap_or_else(|_| "/login".to_string()));

/// Path of the signup page
/// Default: "/signup"
pub static GK_SIGNUP_PATH: LazyLock<String> =
    LazyLock::new(|| std::env::var("GK_SIGNUP_PATH").unwrap_or_else(|_| "/signup".to_string()));

/// Path of the public landing page
/// Default: "/"
pub static GK_HOME_PATH: LazyLock<String> =
    LazyLock::new(|| std::env::var("GK_HOME_PATH").unwrap_or_else(|_| "/".to_string()));

/// Where authenticated visitors land, and where entry pages bounce them to
/// Default: "/dashboard"
pub static GK_PROTECTED_HOME: LazyLock<String> = LazyLock::new(|| {
    std::env::var("GK_PROTECTED_HOME").unwrap_or_else(|_| "/dashboard".to_string())
});

/// Prefix under which API routes live; those answer their own 401s
/// Default: "/api"
pub static GK_API_PREFIX: LazyLock<String> =
    LazyLock::new(|| std::env::var("GK_API_PREFIX").unwrap_or_else(|_| "/api".to_string()));

/// Path of the authorization-code callback route
/// Default: "/auth/callback"
pub static GK_AUTH_CALLBACK_PATH: LazyLock<String> = LazyLock::new(|| {
    std::env::var("GK_AUTH_CALLBACK_PATH").unwrap_or_else(|_| "/auth/callback".to_string())
});

/// Whether cookies carry the Secure attribute.
///
/// `GK_COOKIE_SECURE` wins when set; otherwise Secure is on exactly when
/// `GK_ENV` is "production".
pub static GK_COOKIE_SECURE: LazyLock<bool> = LazyLock::new(|| {
    std::env::var("GK_COOKIE_SECURE")
        .map(|val| val.to_lowercase() != "false")
        .unwrap_or_else(|_| {
            std::env::var("GK_ENV")
                .map(|env| env == "production")
                .unwrap_or(false)
        })
});
