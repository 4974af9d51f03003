use axum::{
    Json,
    extract::{FromRequestParts, OptionalFromRequestParts},
    response::{IntoResponse, Response},
};
use http::{StatusCode, request::Parts};
use serde_json::json;

use gatekeeper::IdentityUser;

/// Authenticated user resolved by the gatekeeper, available as an extractor
///
/// The gatekeeper middleware inserts this into request extensions after the
/// session accessor resolves the visitor. Requiring it in a handler yields a
/// 401 JSON rejection when no session is present - handlers never redirect.
///
/// # Example
///
/// ```no_run
/// use axum::{routing::get, Router};
/// use gatekeeper_axum::CurrentUser;
///
/// async fn protected_handler(user: CurrentUser) -> String {
///     format!("Hello, {}!", user.0.email)
/// }
///
/// let app: Router = Router::new()
///     .route("/protected", get(protected_handler));
/// ```
#[derive(Clone, Debug)]
pub struct CurrentUser(pub IdentityUser);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<CurrentUser>().cloned().ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Not authenticated." })),
            )
                .into_response()
        })
    }
}

impl<S> OptionalFromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<CurrentUser>().cloned())
    }
}
