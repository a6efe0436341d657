//! The panel loop: the single owner of the registry and the render surface.
//!
//! Each tick runs four steps in order:
//!
//! 1. adopt at most one pending configuration reload
//! 2. turn pointer events into page turns and taps (a tap sends a toggle)
//! 3. poll every light when the poll interval has elapsed
//! 4. push changed tile states to the surface
//!
//! Remote calls are awaited inline, so a slow backend stalls the loop for at
//! most the client's connect and request timeouts. The loop runs on its own
//! current-thread runtime and never shares its state with other threads.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use lightdeck_core::{LightState, ReloadReceiver, ReloadRequest, RemoteSettings};
use lightdeck_remote::{NoopRemoteClient, RemoteConnector, RemoteLights, TogglePolicy};
use tokio::time::Instant;

use crate::gesture::{Gesture, GestureTracker};
use crate::layout;
use crate::registry::LightRegistry;
use crate::surface::{PointerSource, RenderSurface};

/// Timing and behaviour of the panel loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelSettings {
    /// Time between polls of every light.
    pub poll_interval: Duration,
    /// Minimum time between ticks.
    pub frame: Duration,
    /// How toggles choose their direction.
    pub toggle_policy: TogglePolicy,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(5000),
            frame: Duration::from_millis(33),
            toggle_policy: TogglePolicy::default(),
        }
    }
}

/// The panel loop state.
pub struct Panel<S, P, C> {
    registry: LightRegistry,
    surface: S,
    pointer: P,
    connector: C,
    remote: Arc<dyn RemoteLights>,
    remote_settings: Option<RemoteSettings>,
    reloads: ReloadReceiver,
    settings: PanelSettings,
    gestures: GestureTracker,
    rendered: Vec<LightState>,
    page: usize,
    pages: usize,
    needs_setup: bool,
    next_poll: Option<Instant>,
    revision: u64,
}

impl<S, P, C> Panel<S, P, C>
where
    S: RenderSurface,
    P: PointerSource,
    C: RemoteConnector,
{
    /// Build the panel for `initial` and draw it.
    ///
    /// The first poll happens on the first tick unless the backend still
    /// needs to be configured.
    pub fn new(
        initial: ReloadRequest,
        reloads: ReloadReceiver,
        surface: S,
        pointer: P,
        connector: C,
        settings: PanelSettings,
    ) -> Self {
        let mut panel = Self {
            registry: LightRegistry::default(),
            surface,
            pointer,
            connector,
            remote: Arc::new(NoopRemoteClient::new()),
            remote_settings: None,
            reloads,
            settings,
            gestures: GestureTracker::new(),
            rendered: Vec::new(),
            page: 0,
            pages: 1,
            needs_setup: true,
            next_poll: None,
            revision: 0,
        };
        panel.adopt(initial);
        panel
    }

    /// Run ticks until `shutdown` completes.
    pub async fn run<F>(mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tracing::info!(
            lights = self.registry.len(),
            poll_interval_ms = u64::try_from(self.settings.poll_interval.as_millis()).unwrap_or(u64::MAX),
            policy = %self.settings.toggle_policy,
            "Panel loop started"
        );

        tokio::pin!(shutdown);
        loop {
            self.tick().await;

            tokio::select! {
                biased;
                () = &mut shutdown => break,
                () = tokio::time::sleep(self.settings.frame) => {}
            }
        }

        tracing::info!("Panel loop stopped");
    }

    /// Run one iteration of the loop.
    pub async fn tick(&mut self) {
        if let Some(request) = self.reloads.drain_one() {
            self.adopt(request);
        }

        while let Some(event) = self.pointer.poll() {
            if let Some(gesture) = self.gestures.feed(event) {
                self.handle_gesture(gesture).await;
            }
        }

        self.poll_if_due().await;
        self.render();
    }

    /// The light registry.
    #[must_use]
    pub fn registry(&self) -> &LightRegistry {
        &self.registry
    }

    /// The page currently shown.
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    /// Number of pages.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages
    }

    /// Revision of the configuration in force.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether the setup hint is shown and polling is suspended.
    #[must_use]
    pub fn needs_setup(&self) -> bool {
        self.needs_setup
    }

    fn adopt(&mut self, request: ReloadRequest) {
        let aggregate = request.aggregate;

        let remote_settings = aggregate.remote();
        if self.remote_settings.as_ref() != Some(&remote_settings) {
            self.remote = self.connector.connect(&remote_settings);
            self.remote_settings = Some(remote_settings);
        }

        self.registry.replace_all(aggregate.lights.clone());
        self.rendered = vec![LightState::Unknown; self.registry.len()];
        self.gestures = GestureTracker::new();
        self.page = 0;
        self.pages = layout::page_count(self.registry.len());
        self.needs_setup = aggregate.needs_setup();

        self.surface.rebuild(self.registry.specs(), self.pages);
        self.surface.show_page(self.page);
        self.surface.show_setup_hint(self.needs_setup);

        self.next_poll = (!self.needs_setup).then(Instant::now);
        self.revision = request.revision;

        tracing::info!(
            revision = self.revision,
            lights = self.registry.len(),
            needs_setup = self.needs_setup,
            "Applied configuration"
        );
    }

    async fn handle_gesture(&mut self, gesture: Gesture) {
        match gesture {
            Gesture::Tap(point) => {
                if let Some(index) = layout::hit_test(self.page, point, self.registry.len()) {
                    self.tap(index).await;
                }
            }
            Gesture::SwipeLeft => self.turn_to(self.page + 1),
            Gesture::SwipeRight => self.turn_to(self.page.saturating_sub(1)),
        }
    }

    fn turn_to(&mut self, page: usize) {
        let page = page.min(self.pages - 1);
        if page != self.page {
            self.page = page;
            self.surface.show_page(page);
            tracing::debug!(page, "Turned page");
        }
    }

    async fn tap(&mut self, index: usize) {
        let Some(intent) = self.registry.tap(index) else {
            return;
        };
        // Show the flipped tile before waiting on the backend.
        self.render();

        let remote = Arc::clone(&self.remote);
        if let Err(e) = remote
            .toggle(&intent.id, intent.shown, self.settings.toggle_policy)
            .await
        {
            tracing::warn!(entity_id = %intent.id, error = %e, "Toggle failed");
        }
    }

    async fn poll_if_due(&mut self) {
        let Some(due) = self.next_poll else {
            return;
        };
        if Instant::now() < due {
            return;
        }

        let remote = Arc::clone(&self.remote);
        let outcomes = remote.poll_all(self.registry.specs()).await;
        for (index, outcome) in outcomes.into_iter().enumerate() {
            self.registry.apply_poll(index, outcome);
        }

        self.next_poll = Some(Instant::now() + self.settings.poll_interval);
    }

    fn render(&mut self) {
        for (index, shown) in self.rendered.iter_mut().enumerate() {
            let Some(light) = self.registry.get(index) else {
                continue;
            };
            if *shown != light.optimistic {
                *shown = light.optimistic;
                self.surface.set_tile(index, light.optimistic);
            }
        }
    }
}

impl<S, P, C> std::fmt::Debug for Panel<S, P, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Panel")
            .field("registry", &self.registry)
            .field("page", &self.page)
            .field("pages", &self.pages)
            .field("needs_setup", &self.needs_setup)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}
