//! Configuration read and replace endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use lightdeck_core::{ConfigAggregate, LightSpec};

use crate::auth::Operator;
use crate::error::ApiError;
use crate::state::WebState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// The editable part of the configuration.
///
/// The web password hash is never sent and cannot be changed over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigView {
    /// Remote backend base URL.
    #[serde(default)]
    pub ha_url: String,
    /// Remote backend credential.
    #[serde(default)]
    pub ha_token: String,
    /// Light tiles in order.
    #[serde(default)]
    pub lights: Vec<LightSpec>,
}

impl ConfigView {
    /// View of `aggregate` without the password hash.
    #[must_use]
    pub fn from_aggregate(aggregate: &ConfigAggregate) -> Self {
        Self {
            ha_url: aggregate.remote_endpoint.clone(),
            ha_token: aggregate.remote_credential.clone(),
            lights: aggregate.lights.clone(),
        }
    }

    /// Full aggregate, keeping `web_credential_hash` from the current one.
    #[must_use]
    pub fn into_aggregate(self, web_credential_hash: String) -> ConfigAggregate {
        ConfigAggregate {
            remote_endpoint: self.ha_url,
            remote_credential: self.ha_token,
            web_credential_hash,
            lights: self.lights,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Return the current configuration.
///
/// `GET /api/config`
pub async fn get_config(
    State(state): State<Arc<WebState>>,
    _operator: Operator,
) -> Json<ConfigView> {
    Json(ConfigView::from_aggregate(&state.mutations.current()))
}

/// Replace the whole configuration and trigger a reload.
///
/// `POST /api/config`
pub async fn put_config(
    State(state): State<Arc<WebState>>,
    _operator: Operator,
    body: Result<Json<ConfigView>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(view) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let hash = state.mutations.current().web_credential_hash.clone();
    let revision = state.mutations.submit(view.into_aggregate(hash)).await?;

    tracing::debug!(revision, "Configuration replaced over HTTP");
    Ok(Json(json!({ "ok": true })))
}
