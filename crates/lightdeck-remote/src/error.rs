//! Remote backend error types.

use thiserror::Error;

/// A result type using `RemoteError`.
pub type Result<T> = std::result::Result<T, RemoteError>;

/// Errors talking to the remote light backend.
///
/// None of these are fatal. Connection-level failures leave a light's state
/// untouched, while rejected or unreadable responses degrade it to
/// `Unknown`.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The backend could not be reached.
    #[error("remote backend unreachable: {0}")]
    Transport(String),

    /// The connect or total timeout elapsed.
    #[error("remote request timed out")]
    Timeout,

    /// The backend answered with a non-success HTTP status.
    #[error("remote backend returned status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The response body was not valid JSON.
    #[error("invalid response from remote backend: {0}")]
    Decode(String),

    /// No endpoint or credential is configured.
    #[error("remote backend not configured")]
    NotConfigured,

    /// The HTTP client could not be constructed.
    #[error("failed to build remote client: {0}")]
    Build(String),
}

impl RemoteError {
    /// Whether the request never produced a response.
    ///
    /// Connection failures must not change any light state.
    #[must_use]
    pub const fn is_connection_failure(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout | Self::NotConfigured)
    }
}

impl RemoteError {
    /// Classify a failure while reading a response body.
    ///
    /// The status line has already arrived, but a body that stalls or is cut
    /// off still counts as the backend being unreachable.
    #[must_use]
    pub fn from_body(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else if err.is_builder() {
            Self::Build(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_failures() {
        assert!(RemoteError::Timeout.is_connection_failure());
        assert!(RemoteError::Transport("refused".into()).is_connection_failure());
        assert!(RemoteError::NotConfigured.is_connection_failure());
        assert!(!RemoteError::Status { status: 404 }.is_connection_failure());
        assert!(!RemoteError::Decode("eof".into()).is_connection_failure());
    }

    #[test]
    fn status_display() {
        let err = RemoteError::Status { status: 503 };
        assert_eq!(err.to_string(), "remote backend returned status 503");
    }
}
