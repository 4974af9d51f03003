//! gatekeeper-axum - Axum integration for the gatekeeper edge pipeline
//!
//! Provides the per-request gatekeeper middleware, the auth HTTP endpoints
//! (signin/signup/signout/code callback) and a `CurrentUser` extractor.
//!
//! Wiring it up:
//!
//! ```no_run
//! use std::sync::Arc;
//! use axum::Router;
//! use gatekeeper_axum::{SharedProvider, auth_router, gatekeeper_pipeline};
//! use gatekeeper::HostedIdentityProvider;
//!
//! let provider: SharedProvider =
//!     Arc::new(HostedIdentityProvider::from_env().expect("identity provider config"));
//! let app: Router = Router::new()
//!     .merge(auth_router(provider.clone()))
//!     .layer(axum::middleware::from_fn_with_state(provider, gatekeeper_pipeline));
//! ```

mod auth;
mod config;
mod error;
mod middleware;
mod router;
mod session;

#[cfg(test)]
mod test_utils;

use std::sync::Arc;

/// Request-scoped handle to the identity service, shared through router state.
pub type SharedProvider = Arc<dyn gatekeeper::IdentityProvider>;

pub use config::GK_CSRF_BODY_LIMIT;
pub use middleware::gatekeeper_pipeline;
pub use router::auth_router;
pub use session::CurrentUser;

// Re-exported so applications can depend on this crate alone
pub use gatekeeper::{HostedIdentityProvider, IdentityProvider, IdentityUser};
