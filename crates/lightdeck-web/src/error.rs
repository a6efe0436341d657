//! API error types and responses.
//!
//! Every JSON error has the shape `{"error": {"code": ..., "message": ...}}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use lightdeck_auth::AuthError;
use lightdeck_core::ValidationError;
use lightdeck_store::ConfigError;

/// Why a configuration mutation was refused.
#[derive(Debug, Error)]
pub enum MutationError {
    /// The candidate aggregate violates an invariant.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The candidate could not be persisted.
    #[error("failed to save configuration: {0}")]
    Persist(#[from] ConfigError),

    /// The save task was cancelled or panicked.
    #[error("configuration update interrupted: {0}")]
    Interrupted(String),
}

/// API error type that implements `IntoResponse`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, unknown or expired session.
    #[error("unauthorized")]
    Unauthorized,

    /// The submitted configuration violates an invariant.
    #[error("{0}")]
    Invalid(ValidationError),

    /// Invalid request body or parameters.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

/// Error details.
#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl ApiError {
    /// Get the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::Invalid(err) => err.code(),
            Self::BadRequest(_) => "bad_request",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();
        let message = self.to_string();

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::Unauthenticated => Self::Unauthorized,
            AuthError::Hashing(_) | AuthError::Internal(_) => {
                tracing::error!(error = %err, "Auth internal error");
                Self::Internal("authentication error".to_string())
            }
        }
    }
}

impl From<MutationError> for ApiError {
    fn from(err: MutationError) -> Self {
        match err {
            MutationError::Invalid(invalid) => Self::Invalid(invalid),
            MutationError::Persist(config_err) => {
                tracing::error!(error = %config_err, "Failed to persist configuration");
                Self::Internal("failed to save config".to_string())
            }
            MutationError::Interrupted(reason) => {
                tracing::error!(%reason, "Configuration update interrupted");
                Self::Internal("failed to save config".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_status_codes() {
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::Invalid(ValidationError::EmptyDisplayName { index: 0 }).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::BadRequest("test".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Internal("test".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validation_errors_carry_the_invariant() {
        let err = ApiError::from(MutationError::Invalid(ValidationError::TooManyLights {
            count: 17,
            max: 16,
        }));
        assert_eq!(err.code(), "too_many_lights");
        assert_eq!(err.to_string(), "too many lights: 17 configured, at most 16 allowed");
    }

    #[test]
    fn auth_errors_never_leak_detail() {
        assert!(matches!(
            ApiError::from(AuthError::InvalidCredentials),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from(AuthError::Internal("boom".into())),
            ApiError::Internal(msg) if msg == "authentication error"
        ));
    }
}
