//! Core types and utilities for lightdeck.
//!
//! This crate provides the foundational types shared by every part of the
//! touch-panel control plane:
//!
//! - **Identifiers**: `LightId` (`<domain>.<name>`) and 256-bit `SessionToken`s
//! - **Configuration model**: the immutable, atomically replaced `ConfigAggregate`
//! - **Validation**: the invariants every accepted aggregate must satisfy
//! - **Hand-off channel**: the only path by which a worker thread may ask the
//!   render loop to adopt a new configuration
//!
//! # Example
//!
//! ```
//! use lightdeck_core::{ConfigAggregate, LightSpec, reload_channel, ReloadRequest};
//! use std::sync::Arc;
//!
//! let aggregate = ConfigAggregate {
//!     lights: vec![LightSpec::new("light.kitchen", "Kitchen", "bulb")],
//!     ..ConfigAggregate::default()
//! };
//! aggregate.validate().unwrap();
//!
//! let (tx, rx) = reload_channel();
//! tx.enqueue(ReloadRequest::new(1, Arc::new(aggregate)));
//! assert!(rx.drain_one().is_some());
//! assert!(rx.drain_one().is_none());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod handoff;
pub mod ids;
pub mod types;

pub use error::{Result, ValidationError};
pub use handoff::{reload_channel, Enqueued, ReloadReceiver, ReloadRequest, ReloadSender};
pub use ids::{IdError, LightId, SessionToken};
pub use types::{
    ConfigAggregate, LightSpec, LightState, RemoteSettings, MAX_DISPLAY_NAME_CHARS, MAX_LIGHTS,
};
