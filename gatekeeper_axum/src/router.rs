use axum::{Router, routing::get};

use gatekeeper::{GK_API_PREFIX, GK_AUTH_CALLBACK_PATH};

use super::SharedProvider;
use super::auth;

/// Router carrying the auth endpoints: `{api}/auth/{signin,signup,signout}`
/// and the code-exchange callback route.
///
/// The gatekeeper middleware is deliberately not attached here; apply it at
/// the outermost router so it also covers the application's own routes.
pub fn auth_router(provider: SharedProvider) -> Router {
    Router::new()
        .nest(&format!("{}/auth", GK_API_PREFIX.as_str()), auth::router())
        .route(GK_AUTH_CALLBACK_PATH.as_str(), get(auth::callback))
        .with_state(provider)
}
