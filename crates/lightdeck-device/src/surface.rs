//! Headless display and touch drivers.
//!
//! `LogSurface` reports every tile change through tracing, which is enough to
//! run the controller without a screen attached. Hardware drivers implement
//! the same traits.

use lightdeck_core::{LightId, LightSpec, LightState};
use lightdeck_panel::layout::page_of;
use lightdeck_panel::{PointerEvent, PointerSource, RenderSurface};

/// Render surface that writes to the log.
#[derive(Debug, Default)]
pub struct LogSurface {
    tiles: Vec<(LightId, LightState)>,
    page: usize,
}

impl LogSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderSurface for LogSurface {
    fn rebuild(&mut self, lights: &[LightSpec], page_count: usize) {
        self.tiles = lights
            .iter()
            .map(|light| (light.id.clone(), LightState::Unknown))
            .collect();
        self.page = 0;
        tracing::info!(tiles = self.tiles.len(), pages = page_count, "Tiles rebuilt");
    }

    fn set_tile(&mut self, index: usize, state: LightState) {
        let Some((id, shown)) = self.tiles.get_mut(index) else {
            tracing::warn!(index, "Update for a tile that does not exist");
            return;
        };
        if *shown != state {
            *shown = state;
            tracing::info!(
                entity_id = %id,
                state = state.as_str(),
                page = page_of(index),
                "Tile changed"
            );
        }
    }

    fn show_page(&mut self, page: usize) {
        if self.page != page {
            self.page = page;
            tracing::debug!(page, "Page shown");
        }
    }

    fn show_setup_hint(&mut self, visible: bool) {
        if visible {
            tracing::info!("Backend not configured, finish setup in the web UI");
        }
    }
}

/// Pointer source with no touch hardware behind it.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPointer;

impl PointerSource for NullPointer {
    fn poll(&mut self) -> Option<PointerEvent> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lights() -> Vec<LightSpec> {
        vec![
            LightSpec::new("light.kitchen", "Kitchen", "bulb"),
            LightSpec::new("light.porch", "Porch", "bulb"),
        ]
    }

    #[test]
    fn rebuild_resets_tiles() {
        let mut surface = LogSurface::new();
        surface.rebuild(&lights(), 1);
        surface.set_tile(1, LightState::On);
        surface.show_page(1);

        surface.rebuild(&lights(), 1);
        assert_eq!(surface.page, 0);
        assert!(surface.tiles.iter().all(|(_, state)| *state == LightState::Unknown));
    }

    #[test]
    fn set_tile_tracks_state() {
        let mut surface = LogSurface::new();
        surface.rebuild(&lights(), 1);

        surface.set_tile(0, LightState::Off);
        surface.set_tile(7, LightState::On);

        assert_eq!(surface.tiles[0].1, LightState::Off);
        assert_eq!(surface.tiles[1].1, LightState::Unknown);
    }

    #[test]
    fn null_pointer_is_silent() {
        assert!(NullPointer.poll().is_none());
    }
}
