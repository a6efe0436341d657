//! Authentication error types.

use thiserror::Error;

/// A result type using `AuthError`.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors that can occur during authentication.
///
/// A failed login only ever reports `InvalidCredentials`; callers learn
/// nothing beyond pass/fail.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The password did not match the stored hash.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The request carried no session, or an expired or unknown one.
    #[error("not authenticated")]
    Unauthenticated,

    /// A password could not be hashed.
    #[error("password hashing failed: {0}")]
    Hashing(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Returns the appropriate HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidCredentials | Self::Unauthenticated => 401,
            Self::Hashing(_) | Self::Internal(_) => 500,
        }
    }
}
