//! Web server configuration types.

use std::time::Duration;

use lightdeck_auth::SessionConfig;
use serde::Deserialize;

/// Configuration for the operator web server.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Listen address (e.g., "0.0.0.0:8080").
    #[serde(default = "WebConfig::default_listen_addr")]
    pub listen_addr: String,

    /// Maximum request body size in bytes.
    #[serde(default = "WebConfig::default_max_body")]
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    #[serde(default = "WebConfig::default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// Operator session settings.
    #[serde(default)]
    pub sessions: SessionConfig,
}

impl WebConfig {
    fn default_listen_addr() -> String {
        "0.0.0.0:8080".to_string()
    }

    const fn default_max_body() -> usize {
        64 * 1024 // 64 KiB
    }

    const fn default_request_timeout() -> u64 {
        30
    }

    /// Get the request timeout as a `Duration`.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            listen_addr: Self::default_listen_addr(),
            max_body_bytes: Self::default_max_body(),
            request_timeout_seconds: Self::default_request_timeout(),
            sessions: SessionConfig::default(),
        }
    }
}
