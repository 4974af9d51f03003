//! The gatekeeper: a single per-request interception pipeline that runs
//! before any page or API route. Stages are strictly sequential and each may
//! short-circuit: CORS preflight, CSRF guard, session accessor, route policy.

use axum::{
    body::{Body, to_bytes},
    extract::{Request, State},
    http::{HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use gatekeeper::{
    CSRF_BODY_FIELD, CSRF_HEADER_NAME, CookieCarrier, GK_LOGIN_PATH, PolicyDecision, RouteClass,
    SessionError, classify, current_user, decide, issue_csrf_token, issues_csrf_token,
    requires_csrf_token, verify_csrf_token,
};

use super::SharedProvider;
use super::config::GK_CSRF_BODY_LIMIT;
use super::session::CurrentUser;

const CORS_ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, PATCH, OPTIONS";
const CORS_ALLOW_HEADERS: &str = "Content-Type, X-CSRF-Token, Authorization";
const CORS_MAX_AGE: &str = "86400";

/// Per-request gatekeeper middleware.
///
/// Apply with `axum::middleware::from_fn_with_state` at the outermost router
/// so every page and API route passes through it.
pub async fn gatekeeper_pipeline(
    State(provider): State<SharedProvider>,
    req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();

    if classify(&path) == RouteClass::Asset {
        return next.run(req).await;
    }

    if req.method() == Method::OPTIONS {
        return preflight_response(&req);
    }

    let mut cookies = match CookieCarrier::from_headers(req.headers()) {
        Ok(cookies) => cookies,
        Err(e) => {
            tracing::debug!("Rejecting request with unreadable cookies: {e}");
            return (StatusCode::BAD_REQUEST, "Invalid cookie header").into_response();
        }
    };

    let method = req.method().clone();
    let mut req = req;

    if issues_csrf_token(&method) {
        if let Err(e) = issue_csrf_token(&mut cookies) {
            tracing::error!("Failed to issue CSRF token: {e}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response();
        }
    } else if requires_csrf_token(&method) {
        let (presented, restored) = match presented_csrf_token(req).await {
            Ok(outcome) => outcome,
            Err(response) => return response,
        };
        req = restored;

        if let Err(err) = verify_csrf_token(cookies.csrf_cookie(), presented.as_deref()) {
            let message = match err {
                SessionError::CsrfToken(msg) => msg,
                other => other.to_string(),
            };
            return (StatusCode::FORBIDDEN, message).into_response();
        }
    }

    // Provider failures degrade to "absent" inside the accessor; the policy
    // below still keeps protected routes closed.
    let user = current_user(provider.as_ref(), &mut cookies).await;

    match decide(&path, user.is_some()) {
        PolicyDecision::RedirectToLogin { return_to } => {
            let location = format!(
                "{}?redirect_to={}",
                GK_LOGIN_PATH.as_str(),
                urlencoding::encode(&return_to)
            );
            return with_cookies(Redirect::temporary(&location).into_response(), cookies);
        }
        PolicyDecision::RedirectToHome { location } => {
            return with_cookies(Redirect::temporary(&location).into_response(), cookies);
        }
        PolicyDecision::Allow => {}
    }

    if let Some(user) = user {
        req.extensions_mut().insert(CurrentUser(user));
    }

    let response = next.run(req).await;
    with_cookies(response, cookies)
}

/// Flush queued Set-Cookie values onto an outgoing response.
fn with_cookies(mut response: Response, cookies: CookieCarrier) -> Response {
    let headers = cookies.into_headers();
    for value in headers.get_all(header::SET_COOKIE) {
        response.headers_mut().append(header::SET_COOKIE, value.clone());
    }
    response
}

/// Answer a CORS preflight without running any later stage. Echoes the
/// request origin, wildcard when absent. Never touches cookies.
fn preflight_response(req: &Request) -> Response {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("*"));

    let mut response = StatusCode::NO_CONTENT.into_response();
    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(CORS_ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(CORS_ALLOW_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static(CORS_MAX_AGE),
    );
    response
}

/// Extract the caller-presented CSRF token: the `X-CSRF-Token` header wins,
/// else a `csrf_token` field in a JSON or form body. The body is buffered and
/// restored so the downstream handler still reads the original bytes.
async fn presented_csrf_token(req: Request) -> Result<(Option<String>, Request), Response> {
    if let Some(token) = req
        .headers()
        .get(CSRF_HEADER_NAME)
        .and_then(|v| v.to_str().ok())
    {
        return Ok((Some(token.to_string()), req));
    }

    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();
    let is_json = content_type.starts_with("application/json");
    let is_form = content_type.starts_with("application/x-www-form-urlencoded");
    if !is_json && !is_form {
        return Ok((None, req));
    }

    let (parts, body) = req.into_parts();
    let bytes = match to_bytes(body, *GK_CSRF_BODY_LIMIT).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!("Failed to buffer request body for CSRF check: {e}");
            return Err((StatusCode::FORBIDDEN, "CSRF token mismatch".to_string()).into_response());
        }
    };

    let token = if is_json {
        serde_json::from_slice::<serde_json::Value>(&bytes)
            .ok()
            .and_then(|value| {
                value
                    .get(CSRF_BODY_FIELD)
                    .and_then(|t| t.as_str())
                    .map(|s| s.to_string())
            })
    } else {
        url::form_urlencoded::parse(&bytes)
            .find(|(key, _)| key == CSRF_BODY_FIELD)
            .map(|(_, value)| value.into_owned())
    };

    Ok((token, Request::from_parts(parts, Body::from(bytes))))
}
