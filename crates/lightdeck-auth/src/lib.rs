//! Operator authentication for lightdeck.
//!
//! This crate provides the primitives behind the web configuration UI's
//! login flow:
//!
//! - A `CredentialVerifier` that checks the operator password against the
//!   bcrypt hash stored in the configuration file
//! - A fixed-size, lock-guarded `SessionTable` with LRU eviction and
//!   inactivity expiry
//! - The `Authenticator`, which combines both and rate-limits failed logins
//!   with a fixed delay
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────────┐
//! │   Web handlers   │────▶│  Authenticator   │
//! │  (worker threads)│     │                  │
//! └──────────────────┘     └───┬──────────┬───┘
//!                              │          │
//!                   ┌──────────▼───┐  ┌───▼──────────┐
//!                   │ Credential   │  │ SessionTable │
//!                   │ Verifier     │  │ (Mutex, N=8) │
//!                   └──────────────┘  └──────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use lightdeck_auth::{Authenticator, SessionConfig};
//!
//! # async fn example(stored_hash: &str) -> Result<(), Box<dyn std::error::Error>> {
//! let auth = Authenticator::new(SessionConfig::default());
//!
//! let token = auth.login("hunter2", stored_hash).await?;
//! assert!(auth.validate(&token));
//! auth.logout(&token);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod clock;
pub mod credential;
pub mod error;
pub mod sessions;

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

pub use clock::{Clock, SystemClock};
pub use credential::{hash_password, BcryptVerifier, CredentialVerifier, DEFAULT_HASH_COST};
pub use error::{AuthError, Result};
pub use lightdeck_core::SessionToken;
pub use sessions::SessionTable;

#[cfg(any(test, feature = "test-utils"))]
pub use clock::ManualClock;

/// Configuration for operator sessions.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Maximum number of concurrent sessions.
    #[serde(default = "SessionConfig::default_capacity")]
    pub capacity: usize,

    /// Inactivity timeout in seconds.
    #[serde(default = "SessionConfig::default_timeout")]
    pub timeout_seconds: u64,

    /// Delay applied to every failed login, in milliseconds.
    #[serde(default = "SessionConfig::default_failure_delay")]
    pub failure_delay_ms: u64,
}

impl SessionConfig {
    const fn default_capacity() -> usize {
        8
    }

    const fn default_timeout() -> u64 {
        3600 // 1 hour
    }

    const fn default_failure_delay() -> u64 {
        1000
    }

    /// Get the inactivity timeout as a `Duration`.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Get the failed-login delay as a `Duration`.
    #[must_use]
    pub fn failure_delay(&self) -> Duration {
        Duration::from_millis(self.failure_delay_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            capacity: Self::default_capacity(),
            timeout_seconds: Self::default_timeout(),
            failure_delay_ms: Self::default_failure_delay(),
        }
    }
}

/// Login, session validation and logout for the web operator.
pub struct Authenticator {
    verifier: Arc<dyn CredentialVerifier>,
    sessions: SessionTable,
    failure_delay: Duration,
}

impl Authenticator {
    /// Create an authenticator using bcrypt and the system clock.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self::with_parts(config, Arc::new(BcryptVerifier), Arc::new(SystemClock))
    }

    /// Create an authenticator with a custom verifier and clock.
    #[must_use]
    pub fn with_parts(
        config: SessionConfig,
        verifier: Arc<dyn CredentialVerifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            verifier,
            sessions: SessionTable::new(config.capacity, config.timeout(), clock),
            failure_delay: config.failure_delay(),
        }
    }

    /// Verify `password` against `stored_hash` and open a session.
    ///
    /// A mismatch is reported only after the failure delay has elapsed.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` on mismatch, or
    /// `AuthError::Internal` if the verification task panicked.
    pub async fn login(&self, password: &str, stored_hash: &str) -> Result<SessionToken> {
        let verifier = Arc::clone(&self.verifier);
        let password = password.to_owned();
        let hash = stored_hash.to_owned();

        // bcrypt is deliberately slow; keep it off the async workers.
        let matched = tokio::task::spawn_blocking(move || verifier.verify(&password, &hash))
            .await
            .map_err(|e| AuthError::Internal(format!("credential check failed: {e}")))?;

        if matched {
            let token = self.sessions.create();
            tracing::info!("Operator logged in");
            Ok(token)
        } else {
            tokio::time::sleep(self.failure_delay).await;
            tracing::warn!("Rejected operator login");
            Err(AuthError::InvalidCredentials)
        }
    }

    /// Whether `token` names a live session. A hit refreshes the session.
    #[must_use]
    pub fn validate(&self, token: &SessionToken) -> bool {
        self.sessions.validate(token)
    }

    /// End the session for `token`. Idempotent.
    pub fn logout(&self, token: &SessionToken) {
        self.sessions.remove(token);
        tracing::info!("Operator logged out");
    }

    /// The underlying session table.
    #[must_use]
    pub fn sessions(&self) -> &SessionTable {
        &self.sessions
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("sessions", &self.sessions)
            .field("failure_delay", &self.failure_delay)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    const TEST_COST: u32 = 4;

    fn authenticator(clock: &ManualClock) -> Authenticator {
        Authenticator::with_parts(
            SessionConfig::default(),
            Arc::new(BcryptVerifier),
            Arc::new(clock.clone()),
        )
    }

    #[test]
    fn default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.capacity, 8);
        assert_eq!(config.timeout(), Duration::from_secs(3600));
        assert_eq!(config.failure_delay(), Duration::from_secs(1));
    }

    #[test]
    fn auth_error_status_codes() {
        assert_eq!(AuthError::InvalidCredentials.http_status_code(), 401);
        assert_eq!(AuthError::Unauthenticated.http_status_code(), 401);
        assert_eq!(AuthError::Internal("x".into()).http_status_code(), 500);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_logins_are_delayed_then_correct_password_succeeds() {
        let clock = ManualClock::new();
        let auth = authenticator(&clock);
        let hash = hash_password("correct horse", TEST_COST).unwrap();

        for _ in 0..3 {
            let started = Instant::now();
            let result = auth.login("wrong", &hash).await;
            assert!(matches!(result, Err(AuthError::InvalidCredentials)));
            assert!(started.elapsed() >= Duration::from_secs(1));
        }

        let token = auth.login("correct horse", &hash).await.unwrap();
        let hex = token.to_hex();
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(auth.validate(&token));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_stored_hash_rejects_every_password() {
        let clock = ManualClock::new();
        let auth = authenticator(&clock);
        assert!(auth.login("", "").await.is_err());
        assert!(auth.sessions().is_empty());
    }

    #[tokio::test]
    async fn ninth_login_evicts_least_recently_active() {
        let clock = ManualClock::new();
        let auth = authenticator(&clock);
        let hash = hash_password("pw", TEST_COST).unwrap();

        let mut tokens = Vec::new();
        for _ in 0..9 {
            clock.advance(Duration::from_secs(1));
            tokens.push(auth.login("pw", &hash).await.unwrap());
        }

        assert!(!auth.validate(&tokens[0]));
        for token in &tokens[1..] {
            assert!(auth.validate(token));
        }
    }

    #[tokio::test]
    async fn logout_then_validate_fails() {
        let clock = ManualClock::new();
        let auth = authenticator(&clock);
        let hash = hash_password("pw", TEST_COST).unwrap();

        let token = auth.login("pw", &hash).await.unwrap();
        auth.logout(&token);
        auth.logout(&token);
        assert!(!auth.validate(&token));
    }
}
