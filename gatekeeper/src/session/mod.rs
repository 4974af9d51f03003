mod accessor;
mod config;
mod cookie;
mod errors;

pub use config::{GK_CSRF_COOKIE_NAME, GK_SESSION_COOKIE_MAX_AGE, GK_SESSION_COOKIE_NAME};
pub use cookie::{CookieAttributes, CookieCarrier, SameSite};
pub use errors::SessionError;

pub use accessor::{clear_session, current_user, establish_session, exchange_code};
