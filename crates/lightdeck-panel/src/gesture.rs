//! Turning raw press/release pairs into taps and swipes.

use crate::layout::Point;

/// Minimum horizontal travel, in pixels, for a swipe.
pub const SWIPE_THRESHOLD: i32 = 50;

/// A raw pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    /// Finger down.
    Press(Point),
    /// Finger up.
    Release(Point),
}

/// A recognised gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// A tap at the press position.
    Tap(Point),
    /// Finger moved left: show the next page.
    SwipeLeft,
    /// Finger moved right: show the previous page.
    SwipeRight,
}

/// Pairs presses with releases.
#[derive(Debug, Default)]
pub struct GestureTracker {
    pressed_at: Option<Point>,
}

impl GestureTracker {
    /// Create a tracker with no press in progress.
    #[must_use]
    pub const fn new() -> Self {
        Self { pressed_at: None }
    }

    /// Feed one event. A gesture is produced on release.
    pub fn feed(&mut self, event: PointerEvent) -> Option<Gesture> {
        match event {
            PointerEvent::Press(point) => {
                self.pressed_at = Some(point);
                None
            }
            PointerEvent::Release(end) => {
                let start = self.pressed_at.take()?;
                let dx = end.x - start.x;
                let dy = end.y - start.y;

                if dx.abs() >= SWIPE_THRESHOLD && dx.abs() > dy.abs() {
                    Some(if dx < 0 {
                        Gesture::SwipeLeft
                    } else {
                        Gesture::SwipeRight
                    })
                } else {
                    Some(Gesture::Tap(start))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gesture(from: (i32, i32), to: (i32, i32)) -> Option<Gesture> {
        let mut tracker = GestureTracker::new();
        assert_eq!(tracker.feed(PointerEvent::Press(Point::new(from.0, from.1))), None);
        tracker.feed(PointerEvent::Release(Point::new(to.0, to.1)))
    }

    #[test]
    fn short_movement_is_a_tap_at_the_press_point() {
        assert_eq!(gesture((100, 100), (120, 110)), Some(Gesture::Tap(Point::new(100, 100))));
    }

    #[test]
    fn horizontal_movement_is_a_swipe() {
        assert_eq!(gesture((300, 100), (250, 100)), Some(Gesture::SwipeLeft));
        assert_eq!(gesture((100, 100), (200, 120)), Some(Gesture::SwipeRight));
    }

    #[test]
    fn mostly_vertical_movement_is_a_tap() {
        assert_eq!(gesture((100, 50), (160, 200)), Some(Gesture::Tap(Point::new(100, 50))));
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut tracker = GestureTracker::new();
        assert_eq!(tracker.feed(PointerEvent::Release(Point::new(1, 1))), None);
    }
}
