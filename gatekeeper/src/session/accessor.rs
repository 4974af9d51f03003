use super::config::GK_SESSION_COOKIE_NAME;
use super::cookie::{CookieAttributes, CookieCarrier};
use super::errors::SessionError;
use crate::identity::{IdentityError, IdentityProvider, IdentityUser, SessionCredential};

/// Resolve the user behind the session cookie, if any.
///
/// Delegates verification to the identity provider; when the provider rotates
/// the credential during verification, the refreshed cookie is queued on the
/// carrier transparently. Any verification failure degrades to `None` -
/// absence, not an error, is the normal "not logged in" signal.
pub async fn current_user(
    provider: &dyn IdentityProvider,
    cookies: &mut CookieCarrier,
) -> Option<IdentityUser> {
    let credential = cookies.read(GK_SESSION_COOKIE_NAME.as_str())?.to_string();

    match provider.verify_session(&credential).await {
        Ok(verified) => {
            if let Some(rotated) = verified.rotated {
                if let Err(e) = establish_session(cookies, &rotated) {
                    tracing::error!("Failed to queue rotated session cookie: {e}");
                }
            }
            Some(verified.user)
        }
        Err(e) => {
            tracing::debug!("Session verification failed: {e}");
            None
        }
    }
}

/// Queue the session cookie for a freshly issued credential.
pub fn establish_session(
    cookies: &mut CookieCarrier,
    credential: &SessionCredential,
) -> Result<(), SessionError> {
    let mut attrs = CookieAttributes::session();
    attrs.max_age = Some(credential.max_age);
    cookies.write(GK_SESSION_COOKIE_NAME.as_str(), &credential.value, &attrs)
}

/// Queue removal of the session cookie.
pub fn clear_session(cookies: &mut CookieCarrier) -> Result<(), SessionError> {
    cookies.clear(GK_SESSION_COOKIE_NAME.as_str(), &CookieAttributes::session())
}

/// Exchange a one-time authorization code for a session.
///
/// On success the session cookie is queued and the user returned; on failure
/// the provider's error kind is surfaced so the caller can redirect with a
/// reason.
pub async fn exchange_code(
    provider: &dyn IdentityProvider,
    cookies: &mut CookieCarrier,
    code: &str,
) -> Result<IdentityUser, IdentityError> {
    let (user, credential) = provider.exchange_code(code).await?;

    establish_session(cookies, &credential)
        .map_err(|e| IdentityError::Other(format!("Failed to queue session cookie: {e}")))?;

    Ok(user)
}
