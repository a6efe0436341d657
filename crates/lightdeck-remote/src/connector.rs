//! Building a client for the current remote settings.
//!
//! The panel loop rebuilds its client whenever a reload changes the backend
//! endpoint or credential.

use std::sync::Arc;

use lightdeck_core::RemoteSettings;

use crate::client::{NoopRemoteClient, RemoteLights};
use crate::http::{HttpRemoteClient, RemoteTimeouts};

/// Creates a `RemoteLights` client for a set of backend settings.
pub trait RemoteConnector {
    /// Build a client. Unconfigured settings yield a no-op client.
    fn connect(&self, settings: &RemoteSettings) -> Arc<dyn RemoteLights>;
}

/// Connector producing `HttpRemoteClient`s.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpConnector {
    timeouts: RemoteTimeouts,
}

impl HttpConnector {
    /// Create a connector whose clients use `timeouts`.
    #[must_use]
    pub const fn new(timeouts: RemoteTimeouts) -> Self {
        Self { timeouts }
    }
}

impl RemoteConnector for HttpConnector {
    fn connect(&self, settings: &RemoteSettings) -> Arc<dyn RemoteLights> {
        if !settings.is_configured() {
            tracing::info!("Remote backend not configured, using no-op client");
            return Arc::new(NoopRemoteClient::new());
        }

        match HttpRemoteClient::new(settings, self.timeouts) {
            Ok(client) => {
                tracing::info!(endpoint = %client.base_url(), "Connected remote light client");
                Arc::new(client)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to create remote client, using no-op client");
                Arc::new(NoopRemoteClient::new())
            }
        }
    }
}
