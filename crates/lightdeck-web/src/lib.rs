//! Operator login and configuration API for lightdeck.
//!
//! This crate serves the browser UI used to configure the panel. It handles:
//!
//! - Password login with a fixed delay on failure
//! - Cookie sessions backed by a fixed-size session table
//! - Reading and replacing the configuration aggregate
//! - Handing accepted configurations to the panel loop
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Browser                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       lightdeck-web                         │
//! │  ┌─────────────┐ ┌─────────────┐ ┌─────────────────────┐    │
//! │  │  Operator   │ │   Router    │ │  MutationService    │    │
//! │  │  Extractor  │ │  + Handlers │ │  validate → save →  │    │
//! │  └─────────────┘ └─────────────┘ │  publish → enqueue  │    │
//! │                                  └─────────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//!               │                    │                │
//!               ▼                    ▼                ▼
//!        ┌──────────────┐    ┌──────────────┐  ┌──────────────┐
//!        │ SessionTable │    │ ConfigStore  │  │ ReloadSender │──▶ panel
//!        └──────────────┘    └──────────────┘  └──────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use lightdeck_auth::{Authenticator, SessionConfig};
//! use lightdeck_core::reload_channel;
//! use lightdeck_store::{ConfigStore, JsonFileStore};
//! use lightdeck_web::{create_router, MutationService, WebConfig, WebState};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(JsonFileStore::new("/etc/ha_lights.conf"));
//! let initial = Arc::new(store.load()?);
//! let (reloads, _receiver) = reload_channel();
//!
//! let mutations = Arc::new(MutationService::new(store, initial, reloads));
//! let auth = Arc::new(Authenticator::new(SessionConfig::default()));
//! let state = WebState::new(auth, mutations, WebConfig::default());
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, create_router(state)).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod service;
pub mod state;

pub use config::WebConfig;
pub use error::{ApiError, MutationError};
pub use routes::{create_router, serve};
pub use service::MutationService;
pub use state::WebState;

// Re-export key types for convenience
pub use auth::Operator;
pub use handlers::config::ConfigView;
