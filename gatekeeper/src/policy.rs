//! Route-access policy: a pure decision over the request path and session
//! presence. Nothing here touches cookies or the identity service.

use crate::config::{
    GK_API_PREFIX, GK_AUTH_CALLBACK_PATH, GK_HOME_PATH, GK_LOGIN_PATH, GK_PROTECTED_HOME,
    GK_SIGNUP_PATH,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Static assets and friends, exempt from the pipeline entirely.
    Asset,
    /// The landing page, reachable with or without a session.
    Public,
    /// Entry pages an authenticated visitor is bounced away from.
    PublicEntry,
    /// Auth plumbing that must stay reachable mid-flow (the code callback).
    AuthExempt,
    /// API routes answer their own 401s and are never redirected.
    Api,
    Protected,
}

const ASSET_EXTENSIONS: &[&str] = &[".svg", ".png", ".jpg", ".jpeg", ".gif", ".webp"];

fn under_prefix(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .map(|rest| rest.is_empty() || rest.starts_with('/'))
        .unwrap_or(false)
}

pub fn classify(path: &str) -> RouteClass {
    if path == "/favicon.ico"
        || path.starts_with("/static/")
        || path.starts_with("/assets/")
        || ASSET_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
    {
        return RouteClass::Asset;
    }
    if path == GK_HOME_PATH.as_str() {
        return RouteClass::Public;
    }
    if path == GK_LOGIN_PATH.as_str() || path == GK_SIGNUP_PATH.as_str() {
        return RouteClass::PublicEntry;
    }
    if path == GK_AUTH_CALLBACK_PATH.as_str() {
        return RouteClass::AuthExempt;
    }
    if under_prefix(path, GK_API_PREFIX.as_str()) {
        return RouteClass::Api;
    }
    RouteClass::Protected
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyDecision {
    Allow,
    /// Send the visitor to login, remembering where they were going.
    RedirectToLogin { return_to: String },
    /// Already signed in; entry pages bounce to the protected landing page.
    RedirectToHome { location: String },
}

pub fn decide(path: &str, session_present: bool) -> PolicyDecision {
    match classify(path) {
        RouteClass::PublicEntry if session_present => PolicyDecision::RedirectToHome {
            location: GK_PROTECTED_HOME.to_string(),
        },
        RouteClass::Protected if !session_present => PolicyDecision::RedirectToLogin {
            return_to: path.to_string(),
        },
        _ => PolicyDecision::Allow,
    }
}
