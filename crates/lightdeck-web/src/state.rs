//! Web server application state.
//!
//! This module defines the shared state that is available to all request handlers.

use std::sync::Arc;

use lightdeck_auth::Authenticator;

use crate::config::WebConfig;
use crate::service::MutationService;

/// Shared application state for the web server.
///
/// Everything here is safe to use from any worker thread. The light
/// registry is deliberately absent: it belongs to the panel loop.
#[derive(Debug, Clone)]
pub struct WebState {
    /// Operator login and sessions.
    pub auth: Arc<Authenticator>,
    /// Configuration mutations.
    pub mutations: Arc<MutationService>,
    /// Web server configuration.
    pub config: WebConfig,
}

impl WebState {
    /// Create a new web state.
    #[must_use]
    pub fn new(auth: Arc<Authenticator>, mutations: Arc<MutationService>, config: WebConfig) -> Self {
        Self {
            auth,
            mutations,
            config,
        }
    }
}
