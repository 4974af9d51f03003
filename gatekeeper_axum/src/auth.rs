//! Auth endpoints: signin, signup, signout and the authorization-code
//! callback. All of them build their cookie carrier from the request and take
//! the identity provider from router state.

use std::collections::HashMap;
use std::sync::LazyLock;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::Redirect,
    routing::post,
};
use axum_extra::{TypedHeader, headers};
use regex::Regex;
use serde::Deserialize;
use serde_json::{Value, json};

use gatekeeper::{
    CookieCarrier, GK_AUTH_CALLBACK_PATH, GK_LOGIN_PATH, GK_PROTECTED_HOME,
    GK_SESSION_COOKIE_NAME, IdentityError, SignupOutcome, clear_session, establish_session,
    exchange_code,
};

use super::SharedProvider;
use super::error::IntoResponseError;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\w.+-]+@([\w-]+\.)+[\w-]{2,}$").expect("email pattern is valid")
});

const MIN_PASSWORD_LEN: usize = 6;

pub(super) fn router() -> Router<SharedProvider> {
    Router::new()
        .route("/signin", post(signin))
        .route("/signup", post(signup))
        .route("/signout", post(signout))
}

#[derive(Debug, Deserialize)]
pub(super) struct SigninRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

async fn signin(
    State(provider): State<SharedProvider>,
    headers: HeaderMap,
    Json(request): Json<SigninRequest>,
) -> Result<(HeaderMap, Json<Value>), (StatusCode, Json<Value>)> {
    if request.email.is_empty() || request.password.is_empty() {
        return Err(bad_request("Email and password are required."));
    }

    let (user, credential) = provider
        .sign_in(&request.email, &request.password)
        .await
        .into_response_error()?;

    let mut cookies = CookieCarrier::from_headers(&headers).map_err(internal_error)?;
    establish_session(&mut cookies, &credential).map_err(internal_error)?;

    Ok((
        cookies.into_headers(),
        Json(json!({ "message": "Signed in.", "user_id": user.id })),
    ))
}

#[derive(Debug, Deserialize)]
pub(super) struct SignupRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    options: Option<SignupOptions>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SignupOptions {
    #[serde(rename = "emailRedirectTo")]
    email_redirect_to: Option<String>,
}

async fn signup(
    State(provider): State<SharedProvider>,
    headers: HeaderMap,
    Json(request): Json<SignupRequest>,
) -> Result<(HeaderMap, Json<Value>), (StatusCode, Json<Value>)> {
    if request.email.is_empty() || request.password.is_empty() {
        return Err(bad_request("Email and password are required."));
    }
    if !EMAIL_RE.is_match(&request.email) {
        return Err(bad_request("Please enter a valid email address."));
    }
    if request.password.len() < MIN_PASSWORD_LEN {
        return Err(bad_request(
            "Password must be at least 6 characters long.",
        ));
    }

    let redirect_to = request
        .options
        .and_then(|options| options.email_redirect_to)
        .unwrap_or_else(|| default_callback_url(&headers));

    let outcome = provider
        .sign_up(&request.email, &request.password, Some(&redirect_to))
        .await
        .into_response_error()?;

    match outcome {
        SignupOutcome::ConfirmationPending { .. } => Ok((
            HeaderMap::new(),
            Json(json!({
                "message": "Confirmation email sent. Follow the link inside to finish signing up."
            })),
        )),
        SignupOutcome::SessionIssued { user, credential } => {
            let mut cookies = CookieCarrier::from_headers(&headers).map_err(internal_error)?;
            establish_session(&mut cookies, &credential).map_err(internal_error)?;
            Ok((
                cookies.into_headers(),
                Json(json!({ "message": "Account created and signed in.", "user_id": user.id })),
            ))
        }
    }
}

async fn signout(
    State(provider): State<SharedProvider>,
    cookies: Option<TypedHeader<headers::Cookie>>,
    headers: HeaderMap,
) -> Result<(HeaderMap, Json<Value>), (StatusCode, Json<Value>)> {
    let credential = cookies
        .as_ref()
        .and_then(|TypedHeader(cookies)| cookies.get(GK_SESSION_COOKIE_NAME.as_str()));

    if let Some(credential) = credential {
        match provider.sign_out(credential).await {
            // A credential the provider no longer recognizes is already signed out
            Ok(()) | Err(IdentityError::SessionInvalid) => {}
            Err(e) => {
                tracing::error!("Signout failed: {e}");
                return Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to sign out." })),
                ));
            }
        }
    }

    let mut carrier = CookieCarrier::from_headers(&headers).map_err(internal_error)?;
    clear_session(&mut carrier).map_err(internal_error)?;

    Ok((
        carrier.into_headers(),
        Json(json!({ "message": "Signed out." })),
    ))
}

/// `GET /auth/callback?code=...` - exchange the one-time code for a session.
pub(super) async fn callback(
    State(provider): State<SharedProvider>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> (HeaderMap, Redirect) {
    let Some(code) = params.get("code") else {
        return (
            HeaderMap::new(),
            Redirect::temporary(GK_LOGIN_PATH.as_str()),
        );
    };

    let mut cookies = match CookieCarrier::from_headers(&headers) {
        Ok(cookies) => cookies,
        Err(e) => {
            tracing::error!("Unreadable cookies on callback: {e}");
            return (
                HeaderMap::new(),
                Redirect::temporary(GK_LOGIN_PATH.as_str()),
            );
        }
    };

    match exchange_code(provider.as_ref(), &mut cookies, code).await {
        Ok(_user) => (
            cookies.into_headers(),
            Redirect::temporary(GK_PROTECTED_HOME.as_str()),
        ),
        Err(e) => {
            tracing::warn!("Code exchange failed: {e}");
            let location = format!("{}?error={}", GK_LOGIN_PATH.as_str(), exchange_error_reason(&e));
            (HeaderMap::new(), Redirect::temporary(&location))
        }
    }
}

/// Redirect query reason for a failed exchange; a slug, never raw detail.
fn exchange_error_reason(error: &IdentityError) -> &'static str {
    match error {
        IdentityError::InvalidCredentials | IdentityError::SessionInvalid => "invalid_code",
        IdentityError::AlreadyRegistered => "already_registered",
        IdentityError::Http(_) | IdentityError::Serde(_) | IdentityError::Other(_) => {
            "exchange_failed"
        }
    }
}

/// Confirmation links land on the callback route of the requesting origin
/// unless the caller picked a target explicitly.
fn default_callback_url(headers: &HeaderMap) -> String {
    let origin = headers
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(|origin| origin.to_string())
        .unwrap_or_else(|| {
            let host = headers
                .get(header::HOST)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("localhost");
            format!("http://{host}")
        });
    format!("{origin}{}", GK_AUTH_CALLBACK_PATH.as_str())
}

fn bad_request(message: &str) -> (StatusCode, Json<Value>) {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn internal_error<E: std::fmt::Display>(error: E) -> (StatusCode, Json<Value>) {
    tracing::error!("{error}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "An unexpected error occurred." })),
    )
}
