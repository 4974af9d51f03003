use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User record as returned by the identity service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityUser {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Opaque proof of authentication, carried verbatim in the session cookie.
/// Only the issuing provider knows what is inside `value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCredential {
    pub value: String,
    /// Cookie Max-Age in seconds
    pub max_age: i64,
}

/// Result of verifying a session credential.
#[derive(Debug, Clone)]
pub struct VerifiedSession {
    pub user: IdentityUser,
    /// Present when the provider rotated the credential during verification;
    /// the caller must persist it in place of the old one.
    pub rotated: Option<SessionCredential>,
}

/// Result of a signup request.
#[derive(Debug, Clone)]
pub enum SignupOutcome {
    /// The provider auto-confirmed the account and issued a session.
    SessionIssued {
        user: IdentityUser,
        credential: SessionCredential,
    },
    /// A confirmation e-mail is on its way; no session yet.
    ConfirmationPending { user: IdentityUser },
}
