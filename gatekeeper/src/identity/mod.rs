mod config;
mod errors;
mod hosted;
mod provider;
mod types;

pub use config::GK_IDENTITY_URL;
pub use errors::IdentityError;
pub use hosted::HostedIdentityProvider;
pub use provider::IdentityProvider;
pub use types::{IdentityUser, SessionCredential, SignupOutcome, VerifiedSession};
