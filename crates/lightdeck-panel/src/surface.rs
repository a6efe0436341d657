//! Seams to the display and touch hardware.
//!
//! Both traits are driven exclusively from the panel loop's thread, so
//! implementations may hold non-thread-safe handles to a scene graph or a
//! device file.

use lightdeck_core::{LightSpec, LightState};

use crate::gesture::PointerEvent;

/// The single-threaded display the tiles are drawn on.
pub trait RenderSurface {
    /// Recreate every tile for `lights`, all in the `Unknown` style.
    fn rebuild(&mut self, lights: &[LightSpec], page_count: usize);

    /// Restyle tile `index` for `state`.
    fn set_tile(&mut self, index: usize, state: LightState);

    /// Scroll to `page`.
    fn show_page(&mut self, page: usize);

    /// Show or hide the "open the web UI to finish setup" hint.
    fn show_setup_hint(&mut self, visible: bool);
}

/// Source of raw touch events.
pub trait PointerSource {
    /// Next pending event, without blocking.
    fn poll(&mut self) -> Option<PointerEvent>;
}

#[cfg(any(test, feature = "test-utils"))]
pub use doubles::{RecordingSurface, ScriptedPointer, SurfaceCall};

#[cfg(any(test, feature = "test-utils"))]
mod doubles {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use lightdeck_core::{LightId, LightSpec, LightState};

    use super::{PointerSource, RenderSurface};
    use crate::gesture::PointerEvent;
    use crate::layout::Point;

    /// A call made on a `RecordingSurface`.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum SurfaceCall {
        /// `rebuild`, with the ids that were laid out.
        Rebuild {
            /// Light ids in tile order.
            ids: Vec<LightId>,
            /// Page count.
            pages: usize,
        },
        /// `set_tile`
        SetTile(usize, LightState),
        /// `show_page`
        ShowPage(usize),
        /// `show_setup_hint`
        SetupHint(bool),
    }

    /// Surface that records every call. Clones share the recording.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingSurface {
        calls: Rc<RefCell<Vec<SurfaceCall>>>,
    }

    impl RecordingSurface {
        /// Create an empty recording.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Every call so far.
        #[must_use]
        pub fn calls(&self) -> Vec<SurfaceCall> {
            self.calls.borrow().clone()
        }

        /// Forget recorded calls.
        pub fn clear(&self) {
            self.calls.borrow_mut().clear();
        }

        /// The last state pushed to tile `index`, if any.
        #[must_use]
        pub fn tile(&self, index: usize) -> Option<LightState> {
            self.calls.borrow().iter().rev().find_map(|call| match call {
                SurfaceCall::SetTile(i, state) if *i == index => Some(*state),
                _ => None,
            })
        }
    }

    impl RenderSurface for RecordingSurface {
        fn rebuild(&mut self, lights: &[LightSpec], page_count: usize) {
            self.calls.borrow_mut().push(SurfaceCall::Rebuild {
                ids: lights.iter().map(|l| l.id.clone()).collect(),
                pages: page_count,
            });
        }

        fn set_tile(&mut self, index: usize, state: LightState) {
            self.calls.borrow_mut().push(SurfaceCall::SetTile(index, state));
        }

        fn show_page(&mut self, page: usize) {
            self.calls.borrow_mut().push(SurfaceCall::ShowPage(page));
        }

        fn show_setup_hint(&mut self, visible: bool) {
            self.calls.borrow_mut().push(SurfaceCall::SetupHint(visible));
        }
    }

    /// Pointer source fed by the test. Clones share the queue.
    #[derive(Debug, Clone, Default)]
    pub struct ScriptedPointer {
        events: Rc<RefCell<VecDeque<PointerEvent>>>,
    }

    impl ScriptedPointer {
        /// Create an empty script.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue a press and release at the same point.
        pub fn tap(&self, x: i32, y: i32) {
            let point = Point::new(x, y);
            let mut events = self.events.borrow_mut();
            events.push_back(PointerEvent::Press(point));
            events.push_back(PointerEvent::Release(point));
        }

        /// Queue a press at `from` and a release at `to`.
        pub fn drag(&self, from: (i32, i32), to: (i32, i32)) {
            let mut events = self.events.borrow_mut();
            events.push_back(PointerEvent::Press(Point::new(from.0, from.1)));
            events.push_back(PointerEvent::Release(Point::new(to.0, to.1)));
        }
    }

    impl PointerSource for ScriptedPointer {
        fn poll(&mut self) -> Option<PointerEvent> {
            self.events.borrow_mut().pop_front()
        }
    }
}
