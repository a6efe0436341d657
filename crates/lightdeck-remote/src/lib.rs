//! Remote light backend client for lightdeck.
//!
//! The panel never talks HTTP directly. It holds an `Arc<dyn RemoteLights>`
//! built by a `RemoteConnector` from the current configuration, and feeds
//! each `PollOutcome` into its light registry.
//!
//! # Reconciliation rules
//!
//! | Backend answer                    | `PollOutcome`  | Light state      |
//! |-----------------------------------|----------------|------------------|
//! | 2xx with `"state": "on"`/`"off"`  | `Reported`     | set to the value |
//! | 2xx with any other or no state    | `Reported`     | `Unknown`        |
//! | 4xx/5xx, or a body that isn't JSON| `Rejected`     | `Unknown`        |
//! | refused, timed out, unconfigured  | `Unreachable`  | unchanged        |
//!
//! # Example
//!
//! ```no_run
//! use lightdeck_core::{LightId, RemoteSettings};
//! use lightdeck_remote::{HttpRemoteClient, RemoteLights, RemoteTimeouts, TogglePolicy};
//!
//! # async fn example() -> Result<(), lightdeck_remote::RemoteError> {
//! let settings = RemoteSettings {
//!     endpoint: "http://192.168.1.100:8123".into(),
//!     credential: "long-lived-token".into(),
//! };
//! let client = HttpRemoteClient::new(&settings, RemoteTimeouts::default())?;
//!
//! let id = LightId::new("light.kitchen");
//! let outcome = client.poll(&id).await;
//! let command = client.toggle(&id, lightdeck_core::LightState::On, TogglePolicy::RemoteRead).await?;
//! # let _ = (outcome, command);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod client;
pub mod connector;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod fake;
pub mod http;

pub use client::{Command, NoopRemoteClient, PollOutcome, RemoteLights, TogglePolicy};
pub use connector::{HttpConnector, RemoteConnector};
pub use error::{RemoteError, Result};
pub use http::{HttpRemoteClient, RemoteTimeouts};

#[cfg(any(test, feature = "test-utils"))]
pub use fake::{FakeConnector, FakeRemote};
