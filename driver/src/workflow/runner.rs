use crate::workflow::config::MapConfig;
use mapcore::geometry::{Point, Projector, Viewport};
use mapcore::interaction::{PointerEvent, SelectionState};
use mapcore::render::ThemeConfig;
use mapcore::telemetry::MetricsSnapshot;
use mapcore::{ExplorationMapRenderer, MapFrame, Scene, VisitFeed, VisitId};

/// Result of replaying one click against a feed.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickOutcome {
    pub position: Point,
    pub selected: Option<VisitId>,
    /// Geographic coordinate under the pointer, when any visit is projectable.
    pub geo: Option<(f64, f64)>,
}

/// Owns the renderer and the configured canvas for offline rendering.
pub struct Runner {
    config: MapConfig,
    renderer: ExplorationMapRenderer,
    theme: ThemeConfig,
}

impl Runner {
    pub fn new(config: MapConfig) -> Self {
        let renderer = ExplorationMapRenderer::new(config.render.clone());
        let theme = config.theme();
        Self {
            config,
            renderer,
            theme,
        }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.config.viewport()
    }

    pub fn render(&self, feed: &VisitFeed, selection: Option<&VisitId>) -> Scene {
        self.render_with_theme(feed, selection, &self.theme)
    }

    pub fn render_with_theme(
        &self,
        feed: &VisitFeed,
        selection: Option<&VisitId>,
        theme: &ThemeConfig,
    ) -> Scene {
        let frame = MapFrame::new(&feed.visits, theme, self.viewport()).with_selection(selection);
        self.renderer.render(&frame)
    }

    /// Clicks at a point local to the canvas and applies the result to `selection`.
    pub fn click(
        &self,
        feed: &VisitFeed,
        selection: &mut SelectionState,
        position: Point,
    ) -> ClickOutcome {
        let viewport = self.viewport();
        let pointer = PointerEvent::local(position, viewport.size());
        let frame =
            MapFrame::new(&feed.visits, &self.theme, viewport).with_selection(selection.selected());

        let mut reported = None;
        self.renderer
            .click(&frame, &pointer, |next| reported = Some(next));
        let next = reported.flatten();
        selection.set(next.clone());

        let geo = Projector::new(
            &feed.visits,
            viewport.size(),
            &self.config.render.projection,
        )
        .map(|projector| projector.unproject(position));

        ClickOutcome {
            position,
            selected: next,
            geo,
        }
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.renderer.metrics().snapshot()
    }
}
