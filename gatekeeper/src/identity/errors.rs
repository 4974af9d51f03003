use thiserror::Error;

/// Errors reported by the identity-service boundary.
///
/// The kind is decided once, where the provider's response is interpreted;
/// callers match on variants and never inspect message strings.
#[derive(Debug, Error, Clone)]
pub enum IdentityError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account already registered")]
    AlreadyRegistered,

    /// The presented session credential is missing, malformed or expired
    #[error("Session invalid")]
    SessionInvalid,

    #[error("Identity service request failed: {0}")]
    Http(String),

    #[error("Serde error: {0}")]
    Serde(String),

    #[error("Identity service error: {0}")]
    Other(String),
}
