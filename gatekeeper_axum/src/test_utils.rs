//! Shared test fixtures: a deterministic in-memory identity provider.

use std::collections::HashMap;

use async_trait::async_trait;

use gatekeeper::{
    IdentityError, IdentityProvider, IdentityUser, SessionCredential, SignupOutcome,
    VerifiedSession,
};

/// Opaque credential the fake issues for an account. The prefix is what the
/// fake's `verify_session` recognizes; real providers use an opaque envelope.
pub(crate) fn session_cookie_for(email: &str) -> String {
    format!("session:{email}")
}

#[derive(Default)]
pub(crate) struct FakeIdentityProvider {
    pub(crate) accounts: HashMap<String, String>,
    pub(crate) rotate_on_verify: bool,
    pub(crate) error_on_verify: bool,
    pub(crate) error_on_sign_out: bool,
    pub(crate) confirmation_pending: bool,
}

impl FakeIdentityProvider {
    pub(crate) fn with_account(email: &str, password: &str) -> Self {
        Self {
            accounts: HashMap::from([(email.to_string(), password.to_string())]),
            ..Self::default()
        }
    }
}

fn user(email: &str) -> IdentityUser {
    IdentityUser {
        id: format!("id-{email}"),
        email: email.to_string(),
        created_at: None,
    }
}

fn credential(value: String) -> SessionCredential {
    SessionCredential {
        value,
        max_age: 3600,
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    async fn verify_session(&self, credential_value: &str) -> Result<VerifiedSession, IdentityError> {
        if self.error_on_verify {
            return Err(IdentityError::Http("identity service unreachable".to_string()));
        }

        let email = credential_value
            .strip_prefix("session:")
            .or_else(|| credential_value.strip_prefix("rotated:"))
            .ok_or(IdentityError::SessionInvalid)?;

        Ok(VerifiedSession {
            user: user(email),
            rotated: self
                .rotate_on_verify
                .then(|| credential(format!("rotated:{email}"))),
        })
    }

    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(IdentityUser, SessionCredential), IdentityError> {
        match self.accounts.get(email) {
            Some(stored) if stored == password => {
                Ok((user(email), credential(session_cookie_for(email))))
            }
            _ => Err(IdentityError::InvalidCredentials),
        }
    }

    async fn sign_up(
        &self,
        email: &str,
        _password: &str,
        _email_redirect_to: Option<&str>,
    ) -> Result<SignupOutcome, IdentityError> {
        if self.accounts.contains_key(email) {
            return Err(IdentityError::AlreadyRegistered);
        }
        if self.confirmation_pending {
            Ok(SignupOutcome::ConfirmationPending { user: user(email) })
        } else {
            Ok(SignupOutcome::SessionIssued {
                user: user(email),
                credential: credential(session_cookie_for(email)),
            })
        }
    }

    async fn sign_out(&self, _credential: &str) -> Result<(), IdentityError> {
        if self.error_on_sign_out {
            Err(IdentityError::Http("identity service unreachable".to_string()))
        } else {
            Ok(())
        }
    }

    async fn exchange_code(
        &self,
        code: &str,
    ) -> Result<(IdentityUser, SessionCredential), IdentityError> {
        if code == "valid-code" {
            Ok((
                user("exchanged@example.com"),
                credential(session_cookie_for("exchanged@example.com")),
            ))
        } else {
            Err(IdentityError::InvalidCredentials)
        }
    }
}
