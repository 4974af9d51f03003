use thiserror::Error;

use crate::utils::UtilError;

#[derive(Debug, Error, Clone)]
pub enum SessionError {
    #[error("Cookie error: {0}")]
    Cookie(String),

    #[error("CSRF token error: {0}")]
    CsrfToken(String),

    #[error("Header error: {0}")]
    Header(String),

    /// Error from utils operations
    #[error("Utils error: {0}")]
    Utils(#[from] UtilError),
}
