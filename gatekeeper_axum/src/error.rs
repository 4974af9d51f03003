use axum::Json;
use http::StatusCode;
use serde_json::{Value, json};

use gatekeeper::IdentityError;

/// Helper trait for converting boundary errors to a standard response error format
pub(super) trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, Json<Value>)>;
}

/// Maps identity-error kinds to status codes with sanitized messages;
/// internal details only ever reach the logs.
impl<T> IntoResponseError<T> for Result<T, IdentityError> {
    fn into_response_error(self) -> Result<T, (StatusCode, Json<Value>)> {
        self.map_err(|e| {
            let (status, message) = match &e {
                IdentityError::InvalidCredentials => (
                    StatusCode::UNAUTHORIZED,
                    "Invalid email or password.",
                ),
                IdentityError::AlreadyRegistered => (
                    StatusCode::CONFLICT,
                    "This email address is already in use.",
                ),
                IdentityError::SessionInvalid => (
                    StatusCode::UNAUTHORIZED,
                    "Session is missing or expired.",
                ),
                IdentityError::Http(_) | IdentityError::Serde(_) | IdentityError::Other(_) => {
                    tracing::error!("Identity service error: {e}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "An unexpected error occurred.",
                    )
                }
            };
            (status, Json(json!({ "error": message })))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_for(err: IdentityError) -> StatusCode {
        let result: Result<(), IdentityError> = Err(err);
        match result.into_response_error() {
            Err((status, _)) => status,
            Ok(()) => unreachable!("error input must map to an error response"),
        }
    }

    #[test]
    fn test_invalid_credentials_is_unauthorized() {
        assert_eq!(
            status_for(IdentityError::InvalidCredentials),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_already_registered_is_conflict() {
        assert_eq!(
            status_for(IdentityError::AlreadyRegistered),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_session_invalid_is_unauthorized() {
        assert_eq!(
            status_for(IdentityError::SessionInvalid),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_infrastructure_errors_are_internal_and_sanitized() {
        let result: Result<(), IdentityError> =
            Err(IdentityError::Other("connection pool exhausted".to_string()));
        let (status, Json(body)) = result.into_response_error().unwrap_err();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        // The raw detail never reaches the caller
        assert_eq!(body["error"], "An unexpected error occurred.");
    }

    #[test]
    fn test_success_case_passes_through() {
        let result: Result<&str, IdentityError> = Ok("value");
        assert_eq!(result.into_response_error().unwrap(), "value");
    }
}
