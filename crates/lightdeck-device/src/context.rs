//! The application context shared by the panel and the web server.
//!
//! Everything long-lived is created here once, at startup, and handed to
//! the two threads explicitly. The context outlives both of them.

use std::sync::Arc;

use lightdeck_auth::Authenticator;
use lightdeck_core::{reload_channel, ConfigAggregate, ReloadReceiver, ReloadRequest};
use lightdeck_store::ConfigStore;
use lightdeck_web::{MutationService, WebConfig, WebState};

/// Shared services for one run of the device.
pub struct AppContext {
    initial: Arc<ConfigAggregate>,
    auth: Arc<Authenticator>,
    mutations: Arc<MutationService>,
    web_config: WebConfig,
}

impl AppContext {
    /// Load the aggregate from `store` and wire up the services around it.
    ///
    /// Returns the context and the receiving end of the reload hand-off,
    /// which belongs to the panel loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored configuration cannot be loaded.
    pub fn load(
        store: Arc<dyn ConfigStore>,
        web_config: WebConfig,
    ) -> lightdeck_store::Result<(Self, ReloadReceiver)> {
        let aggregate = match store.load() {
            Ok(aggregate) => Arc::new(aggregate),
            Err(e) => {
                tracing::error!(location = %store.location(), error = %e, "Failed to load configuration");
                return Err(e);
            }
        };

        tracing::info!(
            location = %store.location(),
            lights = aggregate.lights.len(),
            needs_setup = aggregate.needs_setup(),
            "Configuration loaded"
        );
        if aggregate.web_credential_hash.is_empty() {
            tracing::warn!("No web password hash configured; operator login is disabled");
        }

        let (reload_tx, reload_rx) = reload_channel();
        let auth = Arc::new(Authenticator::new(web_config.sessions.clone()));
        let mutations = Arc::new(MutationService::new(store, Arc::clone(&aggregate), reload_tx));

        let context = Self {
            initial: aggregate,
            auth,
            mutations,
            web_config,
        };
        Ok((context, reload_rx))
    }

    /// The aggregate the panel starts from.
    pub fn initial_request(&self) -> ReloadRequest {
        ReloadRequest::new(0, Arc::clone(&self.initial))
    }

    /// State for the web server thread.
    pub fn web_state(&self) -> WebState {
        WebState::new(
            Arc::clone(&self.auth),
            Arc::clone(&self.mutations),
            self.web_config.clone(),
        )
    }

    pub fn listen_addr(&self) -> &str {
        &self.web_config.listen_addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lightdeck_core::LightSpec;
    use lightdeck_store::{JsonFileStore, MemoryStore};

    fn aggregate() -> ConfigAggregate {
        ConfigAggregate {
            remote_endpoint: "http://ha.local:8123".to_string(),
            remote_credential: "token".to_string(),
            web_credential_hash: String::new(),
            lights: vec![LightSpec::new("light.kitchen", "Kitchen", "bulb")],
        }
    }

    #[test]
    fn load_builds_initial_request() {
        let store = Arc::new(MemoryStore::new(aggregate()));
        let (context, reloads) = AppContext::load(store, WebConfig::default()).unwrap();

        let initial = context.initial_request();
        assert_eq!(initial.revision, 0);
        assert_eq!(initial.aggregate.lights.len(), 1);
        assert!(reloads.drain_one().is_none());
        assert_eq!(context.listen_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn web_mutations_reach_the_panel_receiver() {
        let store = Arc::new(MemoryStore::new(aggregate()));
        let (context, reloads) = AppContext::load(store, WebConfig::default()).unwrap();

        let state = context.web_state();
        let mut next = aggregate();
        next.lights.push(LightSpec::new("light.porch", "Porch", "bulb"));
        let revision = state.mutations.put_config(next).unwrap();

        let request = reloads.drain_one().unwrap();
        assert_eq!(request.revision, revision);
        assert_eq!(request.aggregate.lights.len(), 2);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonFileStore::new(dir.path().join("absent.conf")));
        assert!(AppContext::load(store, WebConfig::default()).is_err());
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lights.conf");
        std::fs::write(&path, r#"{"lights":[{"entity_id":"nodot","label":"X"}]}"#).unwrap();
        let store = Arc::new(JsonFileStore::new(path));
        assert!(AppContext::load(store, WebConfig::default()).is_err());
    }
}
