//! HTTP client for the remote light backend.

use std::time::Duration;

use async_trait::async_trait;
use lightdeck_core::{LightId, LightState, RemoteSettings};
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;

use crate::client::{Command, RemoteLights};
use crate::error::{RemoteError, Result};

/// Network bounds for every backend request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteTimeouts {
    /// Time allowed to establish the connection.
    pub connect: Duration,
    /// Time allowed for the whole request, including the body.
    pub request: Duration,
}

impl Default for RemoteTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(5),
            request: Duration::from_secs(10),
        }
    }
}

/// HTTP client for the backend's REST API.
///
/// Reads `GET <endpoint>/api/states/<id>` and calls
/// `POST <endpoint>/api/services/<domain>/<service>`.
#[derive(Clone)]
pub struct HttpRemoteClient {
    client: reqwest::Client,
    base_url: String,
    credential: String,
}

#[derive(Debug, Serialize)]
struct ServiceCall<'a> {
    entity_id: &'a str,
}

impl HttpRemoteClient {
    /// Create a client for the backend described by `settings`.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::NotConfigured` if the endpoint or credential is
    /// empty, or `RemoteError::Build` if the HTTP client cannot be created.
    pub fn new(settings: &RemoteSettings, timeouts: RemoteTimeouts) -> Result<Self> {
        if !settings.is_configured() {
            return Err(RemoteError::NotConfigured);
        }

        let client = reqwest::Client::builder()
            .timeout(timeouts.request)
            .connect_timeout(timeouts.connect)
            .build()
            .map_err(|e| RemoteError::Build(e.to_string()))?;

        Ok(Self::with_client(client, settings))
    }

    /// Create a client with a custom reqwest client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, settings: &RemoteSettings) -> Self {
        Self {
            client,
            base_url: settings.endpoint.trim_end_matches('/').to_string(),
            credential: settings.credential.clone(),
        }
    }

    /// Get the base URL, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn state_url(&self, id: &LightId) -> String {
        format!("{}/api/states/{}", self.base_url, id)
    }

    fn service_url(&self, id: &LightId, command: Command) -> String {
        format!(
            "{}/api/services/{}/{}",
            self.base_url,
            id.domain(),
            command.service()
        )
    }
}

#[async_trait]
impl RemoteLights for HttpRemoteClient {
    async fn fetch_state(&self, id: &LightId) -> Result<LightState> {
        let response = self
            .client
            .get(self.state_url(id))
            .bearer_auth(&self.credential)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(RemoteError::from_body)?;
        let body: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|e| RemoteError::Decode(e.to_string()))?;

        let state = body
            .get("state")
            .and_then(serde_json::Value::as_str)
            .map_or(LightState::Unknown, LightState::from_remote);

        tracing::debug!(entity_id = %id, state = %state, "Polled light");
        Ok(state)
    }

    async fn send_command(&self, id: &LightId, command: Command) -> Result<()> {
        let response = self
            .client
            .post(self.service_url(id, command))
            .bearer_auth(&self.credential)
            .json(&ServiceCall {
                entity_id: id.as_str(),
            })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            tracing::warn!(entity_id = %id, status = %status, command = %command, "Backend rejected command");
            Err(RemoteError::Status {
                status: status.as_u16(),
            })
        }
    }
}

impl std::fmt::Debug for HttpRemoteClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRemoteClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
