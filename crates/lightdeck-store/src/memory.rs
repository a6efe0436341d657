//! In-memory configuration store for tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use lightdeck_core::ConfigAggregate;
use parking_lot::Mutex;

use crate::error::{ConfigError, Result};
use crate::ConfigStore;

/// A `ConfigStore` that keeps the aggregate in memory.
///
/// Saves can be made to fail on demand to exercise the "old aggregate stays
/// in force" path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    current: Mutex<ConfigAggregate>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl MemoryStore {
    /// Create a store holding `aggregate`.
    #[must_use]
    pub fn new(aggregate: ConfigAggregate) -> Self {
        Self {
            current: Mutex::new(aggregate),
            ..Self::default()
        }
    }

    /// Make subsequent saves fail (or succeed again).
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// The currently stored aggregate.
    #[must_use]
    pub fn stored(&self) -> ConfigAggregate {
        self.current.lock().clone()
    }
}

impl ConfigStore for MemoryStore {
    fn load(&self) -> Result<ConfigAggregate> {
        let aggregate = self.current.lock().clone();
        aggregate.validate()?;
        Ok(aggregate)
    }

    fn save(&self, aggregate: &ConfigAggregate) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(ConfigError::Io {
                path: "memory".into(),
                source: std::io::Error::other("simulated failure"),
            });
        }
        *self.current.lock() = aggregate.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
