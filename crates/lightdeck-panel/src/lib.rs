//! Light registry, tile layout and render loop for lightdeck.
//!
//! The panel is the only owner of light state. Everything that happens on
//! the screen goes through one `Panel`, driven tick by tick on a single
//! thread:
//!
//! ```text
//!  web worker threads              panel thread
//!  ──────────────────              ─────────────────────────────────────
//!  MutationService ──enqueue──▶ ReloadReceiver ─▶ Panel::tick
//!                                                  │  ├─ PointerSource
//!                                                  │  ├─ RemoteLights
//!                                                  │  └─ LightRegistry
//!                                                  └────▶ RenderSurface
//! ```
//!
//! Display and touch drivers plug in through the [`RenderSurface`] and
//! [`PointerSource`] traits.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod gesture;
pub mod layout;
pub mod panel;
pub mod registry;
pub mod surface;

pub use gesture::{Gesture, GestureTracker, PointerEvent};
pub use layout::Point;
pub use panel::{Panel, PanelSettings};
pub use registry::{LightRegistry, LightRuntime, TapIntent};
pub use surface::{PointerSource, RenderSurface};

#[cfg(any(test, feature = "test-utils"))]
pub use surface::{RecordingSurface, ScriptedPointer, SurfaceCall};
