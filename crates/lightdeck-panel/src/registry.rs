//! The light registry and its per-light state machine.
//!
//! The registry is owned by the panel loop and is deliberately `!Send`:
//! configuration changes from other threads reach it only through the
//! reload hand-off channel, never through a shared reference.
//!
//! # State machine
//!
//! | Event                     | `confirmed`  | `optimistic`           |
//! |---------------------------|--------------|------------------------|
//! | tap                       | unchanged    | `On`↔`Off`, `Unknown`→`On` |
//! | poll reported `v`         | `v`          | `v`                    |
//! | poll rejected (4xx/5xx)   | `Unknown`    | `Unknown`              |
//! | poll unreachable          | unchanged    | unchanged              |
//! | reload                    | `Unknown`    | `Unknown`              |

use std::marker::PhantomData;
use std::rc::Rc;

use lightdeck_core::{LightId, LightSpec, LightState};
use lightdeck_remote::PollOutcome;
use tokio::time::Instant;

/// Mutable runtime state of one light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LightRuntime {
    /// Last state obtained from the backend.
    pub confirmed: LightState,
    /// State currently shown on the tile.
    pub optimistic: LightState,
    /// When `confirmed` was last written.
    pub last_confirmed_at: Option<Instant>,
}

/// A tap that should be sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapIntent {
    /// Light that was tapped.
    pub id: LightId,
    /// Optimistic state shown before the tap.
    pub shown: LightState,
}

/// In-memory state of every configured light.
#[derive(Debug, Default)]
pub struct LightRegistry {
    specs: Vec<LightSpec>,
    runtime: Vec<LightRuntime>,
    _owner_thread: PhantomData<Rc<()>>,
}

impl LightRegistry {
    /// Build a registry with every light `Unknown`.
    #[must_use]
    pub fn new(lights: Vec<LightSpec>) -> Self {
        let runtime = vec![LightRuntime::default(); lights.len()];
        Self {
            specs: lights,
            runtime,
            _owner_thread: PhantomData,
        }
    }

    /// Number of lights.
    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether there are no lights.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// The configured lights, in tile order.
    #[must_use]
    pub fn specs(&self) -> &[LightSpec] {
        &self.specs
    }

    /// Runtime state of light `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<LightRuntime> {
        self.runtime.get(index).copied()
    }

    /// Record a state obtained from the backend.
    pub fn set_confirmed(&mut self, index: usize, state: LightState) {
        if let Some(light) = self.runtime.get_mut(index) {
            light.confirmed = state;
            light.last_confirmed_at = Some(Instant::now());
        }
    }

    /// Set the state shown on the tile.
    pub fn set_optimistic(&mut self, index: usize, state: LightState) {
        if let Some(light) = self.runtime.get_mut(index) {
            light.optimistic = state;
        }
    }

    /// Swap in a new set of lights. Every light starts over as `Unknown`.
    pub fn replace_all(&mut self, lights: Vec<LightSpec>) {
        self.runtime = vec![LightRuntime::default(); lights.len()];
        self.specs = lights;
    }

    /// Apply a tap to light `index`.
    ///
    /// Flips the optimistic state and returns what the backend should be
    /// told, including the state shown before the tap.
    pub fn tap(&mut self, index: usize) -> Option<TapIntent> {
        let shown = self.runtime.get(index)?.optimistic;
        self.set_optimistic(index, shown.after_tap());
        Some(TapIntent {
            id: self.specs[index].id.clone(),
            shown,
        })
    }

    /// Apply the outcome of polling light `index`.
    ///
    /// Returns `true` if the shown state changed.
    pub fn apply_poll(&mut self, index: usize, outcome: PollOutcome) -> bool {
        let Some(before) = self.get(index) else {
            return false;
        };

        let state = match outcome {
            PollOutcome::Reported(state) => state,
            PollOutcome::Rejected => LightState::Unknown,
            PollOutcome::Unreachable => return false,
        };

        self.set_confirmed(index, state);
        self.set_optimistic(index, state);
        before.optimistic != state
    }
}
