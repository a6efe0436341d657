//! Cross-thread hand-off channel for configuration reloads.
//!
//! The web worker threads never touch the light registry or the render
//! surface. Instead they publish a `ReloadRequest` here, and the render loop
//! drains it on its next tick. The channel holds at most one pending request:
//! a newer request supersedes an older one that has not been consumed yet,
//! because only the latest aggregate matters.
//!
//! ```text
//!   web worker(s) ──enqueue──▶ [ slot: Option<ReloadRequest> ] ──drain_one──▶ render loop
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::types::ConfigAggregate;

/// A request for the render loop to adopt a new aggregate.
#[derive(Debug, Clone)]
pub struct ReloadRequest {
    /// Monotonic revision of the published aggregate.
    pub revision: u64,
    /// The aggregate to adopt.
    pub aggregate: Arc<ConfigAggregate>,
}

impl ReloadRequest {
    /// Create a reload request.
    #[must_use]
    pub fn new(revision: u64, aggregate: Arc<ConfigAggregate>) -> Self {
        Self {
            revision,
            aggregate,
        }
    }
}

/// What happened to an enqueued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enqueued {
    /// The slot was empty; the request is pending.
    Queued,
    /// An unconsumed request was replaced by this one.
    Superseded {
        /// Revision of the request that was dropped.
        dropped_revision: u64,
    },
    /// The render loop is gone; the request was discarded.
    Closed,
}

#[derive(Debug, Default)]
struct Slot {
    pending: Option<ReloadRequest>,
    closed: bool,
}

#[derive(Debug, Default)]
struct Shared {
    // The closed flag lives under the same lock as the request so a
    // receiver drop cannot interleave with an enqueue.
    slot: Mutex<Slot>,
    delivered: AtomicU64,
}

/// Producer half, held by the mutation service.
#[derive(Debug, Clone)]
pub struct ReloadSender {
    shared: Arc<Shared>,
}

/// Consumer half, owned by the render loop.
#[derive(Debug)]
pub struct ReloadReceiver {
    shared: Arc<Shared>,
}

/// Create a connected sender/receiver pair.
#[must_use]
pub fn reload_channel() -> (ReloadSender, ReloadReceiver) {
    let shared = Arc::new(Shared::default());
    (
        ReloadSender {
            shared: Arc::clone(&shared),
        },
        ReloadReceiver { shared },
    )
}

impl ReloadSender {
    /// Publish a reload request without blocking on the render loop.
    pub fn enqueue(&self, request: ReloadRequest) -> Enqueued {
        let revision = request.revision;
        let previous = {
            let mut slot = self.shared.slot.lock();
            if slot.closed {
                drop(slot);
                tracing::warn!(revision, "Render loop has stopped, dropping reload request");
                return Enqueued::Closed;
            }
            slot.pending.replace(request)
        };

        match previous {
            Some(old) => {
                tracing::debug!(
                    revision,
                    dropped_revision = old.revision,
                    "Superseded pending reload request"
                );
                Enqueued::Superseded {
                    dropped_revision: old.revision,
                }
            }
            None => {
                tracing::debug!(revision, "Queued reload request");
                Enqueued::Queued
            }
        }
    }

    /// Whether a request is waiting to be drained.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.shared.slot.lock().pending.is_some()
    }

    /// Number of requests the render loop has drained so far.
    #[must_use]
    pub fn delivered(&self) -> u64 {
        self.shared.delivered.load(Ordering::Acquire)
    }
}

impl ReloadReceiver {
    /// Take the pending request, if any. Called once per render tick.
    #[must_use]
    pub fn drain_one(&self) -> Option<ReloadRequest> {
        let request = self.shared.slot.lock().pending.take();
        if request.is_some() {
            self.shared.delivered.fetch_add(1, Ordering::AcqRel);
        }
        request
    }
}

impl Drop for ReloadReceiver {
    fn drop(&mut self) {
        let mut slot = self.shared.slot.lock();
        slot.closed = true;
        slot.pending = None;
    }
}
