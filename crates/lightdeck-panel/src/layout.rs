//! Tile geometry for the 480×320 panel.
//!
//! Lights are laid out four to a page in a 2×2 grid:
//!
//! ```text
//!  ┌──────────────────────────── 480 ───────────────────────────┐
//!  │ pad                                                        │
//!  │    ┌────── 220 ──────┐ gap ┌────── 220 ──────┐             │
//!  │    │     slot 0      │     │     slot 1      │ 130         │
//!  │    └─────────────────┘     └─────────────────┘             │
//!  │                      gap                                   │ 320
//!  │    ┌─────────────────┐     ┌─────────────────┐             │
//!  │    │     slot 2      │     │     slot 3      │ 130         │
//!  │    └─────────────────┘     └─────────────────┘             │
//!  └────────────────────────────────────────────────────────────┘
//! ```

use lightdeck_core::MAX_LIGHTS;

/// Screen width in pixels.
pub const SCREEN_WIDTH: i32 = 480;
/// Screen height in pixels.
pub const SCREEN_HEIGHT: i32 = 320;
/// Tile width in pixels.
pub const TILE_WIDTH: i32 = 220;
/// Tile height in pixels.
pub const TILE_HEIGHT: i32 = 130;
/// Space between neighbouring tiles.
pub const TILE_GAP: i32 = 10;
/// Space between the grid and the screen edge.
pub const OUTER_PAD: i32 = 10;
/// Tiles per row.
pub const GRID_COLUMNS: usize = 2;
/// Tiles per page.
pub const TILES_PER_PAGE: usize = 4;
/// Upper bound on pages.
pub const MAX_PAGES: usize = MAX_LIGHTS / TILES_PER_PAGE;

/// A point on the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub width: i32,
    /// Height.
    pub height: i32,
}

impl Rect {
    /// Whether `point` lies inside, edges inclusive on the top-left only.
    #[must_use]
    pub const fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }
}

/// Number of pages needed for `light_count` lights. Always at least one.
#[must_use]
pub fn page_count(light_count: usize) -> usize {
    light_count.div_ceil(TILES_PER_PAGE).clamp(1, MAX_PAGES)
}

/// Page that shows light `index`.
#[must_use]
pub const fn page_of(index: usize) -> usize {
    index / TILES_PER_PAGE
}

/// On-screen rectangle of grid slot `slot` (0..4).
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub const fn tile_rect(slot: usize) -> Rect {
    let column = (slot % GRID_COLUMNS) as i32;
    let row = ((slot % TILES_PER_PAGE) / GRID_COLUMNS) as i32;
    Rect {
        x: OUTER_PAD + column * (TILE_WIDTH + TILE_GAP),
        y: OUTER_PAD + row * (TILE_HEIGHT + TILE_GAP),
        width: TILE_WIDTH,
        height: TILE_HEIGHT,
    }
}

/// Index of the light whose tile on `page` contains `point`, if any.
#[must_use]
pub fn hit_test(page: usize, point: Point, light_count: usize) -> Option<usize> {
    let slot = (0..TILES_PER_PAGE).find(|&slot| tile_rect(slot).contains(point))?;
    let index = page * TILES_PER_PAGE + slot;
    (index < light_count).then_some(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_for_light_counts() {
        assert_eq!(page_count(0), 1);
        assert_eq!(page_count(1), 1);
        assert_eq!(page_count(4), 1);
        assert_eq!(page_count(5), 2);
        assert_eq!(page_count(16), 4);
        assert_eq!(page_count(40), MAX_PAGES);
    }

    #[test]
    fn lights_map_to_pages() {
        assert_eq!(page_of(0), 0);
        assert_eq!(page_of(3), 0);
        assert_eq!(page_of(4), 1);
        assert_eq!(page_of(15), 3);
    }

    #[test]
    fn grid_fits_on_screen() {
        let last = tile_rect(3);
        assert_eq!(tile_rect(0), Rect { x: 10, y: 10, width: 220, height: 130 });
        assert_eq!(last.x, 240);
        assert_eq!(last.y, 150);
        assert!(last.x + last.width <= SCREEN_WIDTH);
        assert!(last.y + last.height <= SCREEN_HEIGHT);
    }

    #[test]
    fn hit_test_maps_slots_to_lights() {
        assert_eq!(hit_test(0, Point::new(20, 20), 3), Some(0));
        assert_eq!(hit_test(0, Point::new(300, 20), 3), Some(1));
        assert_eq!(hit_test(0, Point::new(20, 200), 3), Some(2));
        // Slot 3 is empty with only three lights.
        assert_eq!(hit_test(0, Point::new(300, 200), 3), None);
        assert_eq!(hit_test(1, Point::new(300, 200), 8), Some(7));
    }

    #[test]
    fn gaps_hit_nothing() {
        assert_eq!(hit_test(0, Point::new(235, 20), 4), None);
        assert_eq!(hit_test(0, Point::new(5, 5), 4), None);
    }
}
