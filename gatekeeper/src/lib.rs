//! gatekeeper - Edge request-interception pipeline for hosted-identity web apps
//!
//! This crate provides the framework-free core of a per-request gatekeeper:
//! anti-forgery token issuance and verification (double-submit cookie),
//! session-cookie access with transparent refresh through an external
//! identity service, and a pure route-access policy.

mod config;
mod csrf;
mod identity;
mod policy;
mod session;
mod utils;

pub use config::{
    GK_API_PREFIX, GK_AUTH_CALLBACK_PATH, GK_COOKIE_SECURE, GK_HOME_PATH, GK_LOGIN_PATH,
    GK_PROTECTED_HOME, GK_SIGNUP_PATH,
};

pub use csrf::{
    CSRF_BODY_FIELD, CSRF_HEADER_NAME, issue_csrf_token, issues_csrf_token, requires_csrf_token,
    verify_csrf_token,
};

pub use identity::{
    GK_IDENTITY_URL, HostedIdentityProvider, IdentityError, IdentityProvider, IdentityUser,
    SessionCredential, SignupOutcome, VerifiedSession,
};

pub use policy::{PolicyDecision, RouteClass, classify, decide};

pub use session::{
    CookieAttributes, CookieCarrier, GK_CSRF_COOKIE_NAME, GK_SESSION_COOKIE_MAX_AGE,
    GK_SESSION_COOKIE_NAME, SameSite, SessionError, clear_session, current_user,
    establish_session, exchange_code,
};

pub use utils::UtilError;
