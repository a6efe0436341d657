//! Configuration store for lightdeck.
//!
//! The store is the single source of truth for which lights and which
//! remote credentials exist. It persists a `ConfigAggregate` as a JSON file
//! in the same shape the device has always used:
//!
//! ```json
//! {
//!   "ha_url": "http://192.168.1.100:8123",
//!   "ha_token": "eyJ...",
//!   "web_password_hash": "$2b$10$...",
//!   "lights": [
//!     { "entity_id": "light.living_room", "label": "Living Room", "icon": "bulb" }
//!   ]
//! }
//! ```
//!
//! Writes are atomic: the new file is written next to the old one and renamed
//! over it, so a crash mid-save never leaves a half-written configuration.
//!
//! # Example
//!
//! ```no_run
//! use lightdeck_store::{ConfigStore, JsonFileStore};
//!
//! let store = JsonFileStore::new("/etc/ha_lights.conf");
//! let aggregate = store.load().unwrap();
//! store.save(&aggregate).unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod file;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

pub use error::{ConfigError, Result};
pub use file::{load, save, JsonFileStore};
#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryStore;

use lightdeck_core::ConfigAggregate;

/// Persistence operations for the configuration aggregate.
///
/// This trait abstracts the storage location, allowing an in-memory
/// implementation in tests.
pub trait ConfigStore: Send + Sync {
    /// Read and validate the persisted aggregate.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is unreadable, unparseable, or holds an
    /// aggregate that violates a validation invariant.
    fn load(&self) -> Result<ConfigAggregate>;

    /// Persist an aggregate, replacing the previous one atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the aggregate cannot be written.
    fn save(&self, aggregate: &ConfigAggregate) -> Result<()>;

    /// Human-readable location, for logs.
    fn location(&self) -> String;
}
