//! The configuration mutation pipeline.
//!
//! A mutation is validated, persisted, published as the current aggregate
//! and handed to the panel loop as a reload request, in that order. A
//! candidate that fails validation or persistence changes nothing: the
//! previous aggregate stays current and no reload is enqueued.
//!
//! The service never touches the light registry. Adoption happens later,
//! on the panel thread, when it drains the hand-off channel.

use std::sync::Arc;

use lightdeck_core::{ConfigAggregate, Enqueued, ReloadRequest, ReloadSender};
use lightdeck_store::ConfigStore;
use parking_lot::{Mutex, RwLock};

use crate::error::MutationError;

#[derive(Debug)]
struct Published {
    revision: u64,
    aggregate: Arc<ConfigAggregate>,
}

/// Validates, persists and publishes configuration changes.
pub struct MutationService {
    store: Arc<dyn ConfigStore>,
    current: RwLock<Published>,
    write_lock: Mutex<()>,
    reloads: ReloadSender,
}

impl MutationService {
    /// Create a service whose current aggregate is `initial` (revision 0).
    #[must_use]
    pub fn new(
        store: Arc<dyn ConfigStore>,
        initial: Arc<ConfigAggregate>,
        reloads: ReloadSender,
    ) -> Self {
        Self {
            store,
            current: RwLock::new(Published {
                revision: 0,
                aggregate: initial,
            }),
            write_lock: Mutex::new(()),
            reloads,
        }
    }

    /// The aggregate currently in force.
    #[must_use]
    pub fn current(&self) -> Arc<ConfigAggregate> {
        Arc::clone(&self.current.read().aggregate)
    }

    /// Revision of the aggregate currently in force.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.current.read().revision
    }

    /// Replace the whole configuration with `candidate`.
    ///
    /// Returns once the candidate is persisted and the reload is enqueued;
    /// the panel adopts it on its next tick.
    ///
    /// # Errors
    ///
    /// Returns `MutationError::Invalid` if the candidate violates an
    /// invariant, or `MutationError::Persist` if it could not be saved.
    pub fn put_config(&self, candidate: ConfigAggregate) -> Result<u64, MutationError> {
        if let Err(e) = candidate.validate() {
            tracing::warn!(error = %e, "Rejected configuration");
            return Err(e.into());
        }

        // Serialise writers so the file and the published revision agree.
        let _writer = self.write_lock.lock();

        self.store.save(&candidate)?;

        let aggregate = Arc::new(candidate);
        let revision = {
            let mut current = self.current.write();
            current.revision += 1;
            current.aggregate = Arc::clone(&aggregate);
            current.revision
        };

        let lights = aggregate.lights.len();
        if let Enqueued::Superseded { dropped_revision } =
            self.reloads.enqueue(ReloadRequest::new(revision, aggregate))
        {
            tracing::debug!(revision, dropped_revision, "Replaced a reload the panel had not picked up");
        }

        tracing::info!(
            revision,
            lights,
            location = %self.store.location(),
            "Saved configuration"
        );
        Ok(revision)
    }

    /// Run `put_config` on the blocking pool.
    ///
    /// Saving writes and syncs a file while holding the writer lock, so
    /// async callers must not run it on a runtime worker.
    ///
    /// # Errors
    ///
    /// Same as `put_config`, plus `MutationError::Interrupted` if the
    /// blocking task did not complete.
    pub async fn submit(self: &Arc<Self>, candidate: ConfigAggregate) -> Result<u64, MutationError> {
        let service = Arc::clone(self);
        tokio::task::spawn_blocking(move || service.put_config(candidate))
            .await
            .map_err(|e| MutationError::Interrupted(e.to_string()))?
    }
}

impl std::fmt::Debug for MutationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MutationService")
            .field("store", &self.store.location())
            .field("revision", &self.revision())
            .finish_non_exhaustive()
    }
}
