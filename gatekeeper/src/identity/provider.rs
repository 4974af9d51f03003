use async_trait::async_trait;

use super::errors::IdentityError;
use super::types::{IdentityUser, SessionCredential, SignupOutcome, VerifiedSession};

/// Boundary to the external identity service.
///
/// Implementations own credential verification, issuance and refresh; the
/// rest of the pipeline treats credentials as opaque strings. Handlers take
/// the provider as an explicit parameter - there is no ambient client.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify a session credential, reporting a rotated replacement when the
    /// service refreshed it as part of verification.
    async fn verify_session(&self, credential: &str) -> Result<VerifiedSession, IdentityError>;

    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(IdentityUser, SessionCredential), IdentityError>;

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        email_redirect_to: Option<&str>,
    ) -> Result<SignupOutcome, IdentityError>;

    async fn sign_out(&self, credential: &str) -> Result<(), IdentityError>;

    /// Exchange a one-time authorization code for a session.
    async fn exchange_code(
        &self,
        code: &str,
    ) -> Result<(IdentityUser, SessionCredential), IdentityError>;
}
