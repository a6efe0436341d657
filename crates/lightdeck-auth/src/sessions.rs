//! Fixed-capacity table of operator sessions.
//!
//! The table is shared by every web worker thread, so all lookups, inserts
//! and evictions happen under one lock. Tokens are stored as blake3 digests;
//! the plaintext token only exists in the operator's cookie.
//!
//! # Slot lifecycle
//!
//! - **login**: take a free (or expired) slot; when every slot is live,
//!   evict the least-recently-active one
//! - **validate**: refresh `last_active_at` on a hit; expired slots found
//!   along the way are cleared
//! - **logout**: clear the matching slot, if any

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use lightdeck_core::SessionToken;
use parking_lot::Mutex;

use crate::clock::Clock;

#[derive(Debug, Clone)]
struct Slot {
    token_digest: blake3::Hash,
    last_active_at: DateTime<Utc>,
}

/// The session table.
pub struct SessionTable {
    slots: Mutex<Vec<Option<Slot>>>,
    timeout: Duration,
    clock: Arc<dyn Clock>,
}

impl SessionTable {
    /// Create a table with `capacity` slots and an inactivity `timeout`.
    #[must_use]
    pub fn new(capacity: usize, timeout: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            slots: Mutex::new(vec![None; capacity.max(1)]),
            timeout,
            clock,
        }
    }

    /// Create a session and return its freshly generated token.
    pub fn create(&self) -> SessionToken {
        let token = SessionToken::generate();
        let now = self.clock.now();
        let slot = Slot {
            token_digest: digest(&token),
            last_active_at: now,
        };

        let mut slots = self.slots.lock();
        let index = self.free_slot(&slots, now).unwrap_or_else(|| {
            let lru = least_recently_active(&slots);
            tracing::info!(slot = lru, "Session table full, evicting least recently active session");
            lru
        });
        slots[index] = Some(slot);
        drop(slots);

        tracing::debug!(slot = index, "Created operator session");
        token
    }

    /// Returns `true` iff `token` names a live session, refreshing it.
    pub fn validate(&self, token: &SessionToken) -> bool {
        let wanted = digest(token);
        let now = self.clock.now();
        let mut slots = self.slots.lock();
        let mut found = false;

        for slot in slots.iter_mut() {
            let Some(session) = slot.as_mut() else {
                continue;
            };

            if self.is_expired(session, now) {
                tracing::debug!("Evicting expired operator session");
                *slot = None;
                continue;
            }

            if !found && session.token_digest == wanted {
                session.last_active_at = now;
                found = true;
            }
        }

        found
    }

    /// Remove the session for `token`. Unknown tokens are ignored.
    pub fn remove(&self, token: &SessionToken) {
        let wanted = digest(token);
        let mut slots = self.slots.lock();
        if let Some(slot) = slots
            .iter_mut()
            .find(|s| s.as_ref().is_some_and(|s| s.token_digest == wanted))
        {
            *slot = None;
            tracing::debug!("Removed operator session");
        }
    }

    /// Number of occupied slots, including expired ones not yet evicted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.lock().iter().filter(|s| s.is_some()).count()
    }

    /// Whether no slot is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of concurrent sessions.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.lock().len()
    }

    /// Drop every session.
    pub fn clear(&self) {
        self.slots.lock().iter_mut().for_each(|s| *s = None);
    }

    fn free_slot(&self, slots: &[Option<Slot>], now: DateTime<Utc>) -> Option<usize> {
        slots.iter().position(|slot| match slot {
            None => true,
            Some(session) => self.is_expired(session, now),
        })
    }

    fn is_expired(&self, session: &Slot, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(session.last_active_at)
            .to_std()
            .is_ok_and(|idle| idle > self.timeout)
    }
}

impl std::fmt::Debug for SessionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTable")
            .field("sessions", &self.len())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

fn digest(token: &SessionToken) -> blake3::Hash {
    blake3::hash(token.as_bytes())
}

fn least_recently_active(slots: &[Option<Slot>]) -> usize {
    slots
        .iter()
        .enumerate()
        .filter_map(|(i, s)| s.as_ref().map(|s| (i, s.last_active_at)))
        .min_by_key(|&(i, at)| (at, i))
        .map_or(0, |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    const HOUR: Duration = Duration::from_secs(3600);

    fn table(capacity: usize) -> (SessionTable, ManualClock) {
        let clock = ManualClock::new();
        let table = SessionTable::new(capacity, HOUR, Arc::new(clock.clone()));
        (table, clock)
    }

    #[test]
    fn created_session_validates() {
        let (table, _clock) = table(8);
        let token = table.create();
        assert!(table.validate(&token));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn unknown_token_fails() {
        let (table, _clock) = table(8);
        table.create();
        assert!(!table.validate(&SessionToken::generate()));
    }

    #[test]
    fn session_expires_after_an_hour_of_inactivity() {
        let (table, clock) = table(8);
        let token = table.create();

        clock.advance(Duration::from_secs(61 * 60));
        assert!(!table.validate(&token));
        assert!(table.is_empty(), "expired slot should be reclaimed");
    }

    #[test]
    fn activity_refreshes_the_timeout() {
        let (table, clock) = table(8);
        let token = table.create();

        clock.advance(Duration::from_secs(50 * 60));
        assert!(table.validate(&token));
        clock.advance(Duration::from_secs(50 * 60));
        assert!(table.validate(&token));
    }

    #[test]
    fn exactly_one_hour_is_still_live() {
        let (table, clock) = table(8);
        let token = table.create();
        clock.advance(HOUR);
        assert!(table.validate(&token));
    }

    #[test]
    fn full_table_evicts_least_recently_active() {
        let (table, clock) = table(8);
        let tokens: Vec<_> = (0..8)
            .map(|_| {
                clock.advance(Duration::from_secs(1));
                table.create()
            })
            .collect();

        // Touch the oldest so the second-oldest becomes the LRU.
        clock.advance(Duration::from_secs(1));
        assert!(table.validate(&tokens[0]));

        clock.advance(Duration::from_secs(1));
        let newcomer = table.create();

        assert_eq!(table.len(), 8);
        assert!(table.validate(&newcomer));
        assert!(table.validate(&tokens[0]));
        assert!(!table.validate(&tokens[1]));
        for token in &tokens[2..] {
            assert!(table.validate(token));
        }
    }

    #[test]
    fn expired_slot_is_reused_before_evicting() {
        let (table, clock) = table(2);
        let stale = table.create();
        clock.advance(Duration::from_secs(2 * 3600));
        let live = table.create();
        let newest = table.create();

        assert!(table.validate(&live));
        assert!(table.validate(&newest));
        assert!(!table.validate(&stale));
    }

    #[test]
    fn remove_is_idempotent() {
        let (table, _clock) = table(8);
        let token = table.create();

        table.remove(&token);
        table.remove(&token);
        assert!(!table.validate(&token));
        assert!(table.is_empty());
    }

    #[test]
    fn concurrent_logins_never_exceed_capacity() {
        let (table, _clock) = table(8);
        let table = Arc::new(table);

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let table = Arc::clone(&table);
                std::thread::spawn(move || {
                    for _ in 0..10 {
                        let token = table.create();
                        table.validate(&token);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(table.len(), 8);
        assert_eq!(table.capacity(), 8);
    }
}
