//! Reqwest client for a hosted GoTrue-style identity service.

use std::time::Duration;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;

use super::config::{GK_IDENTITY_API_KEY, GK_IDENTITY_URL};
use super::errors::IdentityError;
use super::provider::IdentityProvider;
use super::types::{IdentityUser, SessionCredential, SignupOutcome, VerifiedSession};
use crate::session::GK_SESSION_COOKIE_MAX_AGE;

/// Token pair issued by the service, kept inside the opaque cookie envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TokenPair {
    access_token: String,
    refresh_token: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    user: Option<IdentityUser>,
}

/// Error body shapes the service is known to emit.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    msg: Option<String>,
}

pub struct HostedIdentityProvider {
    client: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
}

impl HostedIdentityProvider {
    /// Build a provider from `GK_IDENTITY_URL` / `GK_IDENTITY_API_KEY`.
    pub fn from_env() -> Result<Self, IdentityError> {
        Self::new(GK_IDENTITY_URL.as_str(), GK_IDENTITY_API_KEY.clone())
    }

    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, IdentityError> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| IdentityError::Other(format!("Invalid identity service URL: {e}")))?;
        // Url::join replaces the last path segment unless the base ends in '/'
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }
        Ok(Self {
            client: build_client(),
            base_url,
            api_key,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, IdentityError> {
        self.base_url
            .join(path)
            .map_err(|e| IdentityError::Other(format!("Invalid endpoint path {path:?}: {e}")))
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.api_key {
            Some(key) => builder.header("apikey", key),
            None => builder,
        }
    }

    async fn token_request(
        &self,
        grant_type: &str,
        body: serde_json::Value,
    ) -> Result<TokenResponse, IdentityError> {
        let url = self.endpoint("token")?;
        let response = self
            .request(reqwest::Method::POST, url)
            .query(&[("grant_type", grant_type)])
            .json(&body)
            .send()
            .await
            .map_err(|e| IdentityError::Http(e.to_string()))?;

        decode_or_error(response).await
    }

    async fn fetch_user(&self, access_token: &str) -> Result<IdentityUser, IdentityError> {
        let url = self.endpoint("user")?;
        let response = self
            .request(reqwest::Method::GET, url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| IdentityError::Http(e.to_string()))?;

        decode_or_error(response).await
    }
}

#[async_trait]
impl IdentityProvider for HostedIdentityProvider {
    async fn verify_session(&self, credential: &str) -> Result<VerifiedSession, IdentityError> {
        let pair = decode_credential(credential)?;

        match self.fetch_user(&pair.access_token).await {
            Ok(user) => Ok(VerifiedSession {
                user,
                rotated: None,
            }),
            Err(IdentityError::SessionInvalid) => {
                // Access token no longer valid; spend the refresh token once.
                let response = self
                    .token_request(
                        "refresh_token",
                        json!({ "refresh_token": pair.refresh_token }),
                    )
                    .await?;
                let (user, rotated) = credential_from(response)?;
                Ok(VerifiedSession {
                    user,
                    rotated: Some(rotated),
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(IdentityUser, SessionCredential), IdentityError> {
        let response = self
            .token_request("password", json!({ "email": email, "password": password }))
            .await?;
        credential_from(response)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        email_redirect_to: Option<&str>,
    ) -> Result<SignupOutcome, IdentityError> {
        let url = self.endpoint("signup")?;
        let mut request = self
            .request(reqwest::Method::POST, url)
            .json(&json!({ "email": email, "password": password }));
        if let Some(redirect) = email_redirect_to {
            request = request.query(&[("redirect_to", redirect)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| IdentityError::Http(e.to_string()))?;
        let body: serde_json::Value = decode_or_error(response).await?;

        // Auto-confirming deployments answer with a token response; otherwise
        // the bare user record comes back and a confirmation e-mail is pending.
        if body.get("access_token").is_some() {
            let response: TokenResponse = serde_json::from_value(body)
                .map_err(|e| IdentityError::Serde(format!("Failed to deserialize response body: {e}")))?;
            let (user, credential) = credential_from(response)?;
            Ok(SignupOutcome::SessionIssued { user, credential })
        } else {
            let user: IdentityUser = serde_json::from_value(body)
                .map_err(|e| IdentityError::Serde(format!("Failed to deserialize response body: {e}")))?;
            Ok(SignupOutcome::ConfirmationPending { user })
        }
    }

    async fn sign_out(&self, credential: &str) -> Result<(), IdentityError> {
        let pair = decode_credential(credential)?;
        let url = self.endpoint("logout")?;
        let response = self
            .request(reqwest::Method::POST, url)
            .bearer_auth(&pair.access_token)
            .send()
            .await
            .map_err(|e| IdentityError::Http(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response
            .text()
            .await
            .map_err(|e| IdentityError::Http(e.to_string()))?;
        tracing::debug!("Identity service logout returned {status}: {body}");
        Err(decide_error(status, &body))
    }

    async fn exchange_code(
        &self,
        code: &str,
    ) -> Result<(IdentityUser, SessionCredential), IdentityError> {
        let response = self
            .token_request("pkce", json!({ "auth_code": code }))
            .await?;
        credential_from(response)
    }
}

fn build_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .pool_idle_timeout(Duration::from_secs(90))
        .pool_max_idle_per_host(32)
        .build()
        .expect("Failed to create reqwest client")
}

async fn decode_or_error<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, IdentityError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| IdentityError::Http(e.to_string()))?;

    if !status.is_success() {
        tracing::debug!("Identity service returned {status}: {body}");
        return Err(decide_error(status, &body));
    }

    serde_json::from_str(&body)
        .map_err(|e| IdentityError::Serde(format!("Failed to deserialize response body: {e}")))
}

/// Decide the structured error kind from a non-success response. This is the
/// only place the service's error vocabulary is interpreted.
fn decide_error(status: StatusCode, body: &str) -> IdentityError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let code = parsed.error_code.as_deref().unwrap_or("");
    let message = parsed
        .error_description
        .or(parsed.msg)
        .or(parsed.error.clone())
        .unwrap_or_else(|| status.to_string());

    if code == "user_already_exists"
        || code == "email_exists"
        || message.contains("already registered")
    {
        return IdentityError::AlreadyRegistered;
    }
    if code == "invalid_credentials"
        || parsed.error.as_deref() == Some("invalid_grant")
        || message.contains("Invalid login credentials")
    {
        return IdentityError::InvalidCredentials;
    }
    if status == StatusCode::UNAUTHORIZED {
        return IdentityError::SessionInvalid;
    }
    IdentityError::Other(message)
}

fn credential_from(
    response: TokenResponse,
) -> Result<(IdentityUser, SessionCredential), IdentityError> {
    let user = response
        .user
        .ok_or_else(|| IdentityError::Other("User record missing from token response".to_string()))?;
    let pair = TokenPair {
        access_token: response.access_token,
        refresh_token: response.refresh_token,
    };
    Ok((
        user,
        SessionCredential {
            value: encode_credential(&pair)?,
            max_age: *GK_SESSION_COOKIE_MAX_AGE as i64,
        },
    ))
}

fn encode_credential(pair: &TokenPair) -> Result<String, IdentityError> {
    let json = serde_json::to_string(pair).map_err(|e| IdentityError::Serde(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// A cookie value that does not decode is an expired-or-tampered session,
/// not an infrastructure failure.
fn decode_credential(value: &str) -> Result<TokenPair, IdentityError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(value)
        .map_err(|_| IdentityError::SessionInvalid)?;
    serde_json::from_slice(&bytes).map_err(|_| IdentityError::SessionInvalid)
}
