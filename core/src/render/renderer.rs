use std::sync::Arc;

use crate::geometry::{Projector, Viewport};
use crate::interaction::{next_selection, HitTester, PointerEvent};
use crate::prelude::{FrameInput, Layer, RenderOptions};
use crate::render::layers::{BackgroundLayer, GlowLayer, GridLayer, LegendLayer, PathLayer};
use crate::render::markers::{place_markers, MarkerLayer};
use crate::render::scene::Scene;
use crate::render::text::{EstimatedTextMeasure, TextMeasure};
use crate::render::theme::ThemeConfig;
use crate::telemetry::{LogManager, MetricsRecorder};
use crate::visit::{VisitId, VisitRecord};

/// Everything the host passes in for one frame.
#[derive(Debug, Clone, Copy)]
pub struct MapFrame<'a> {
    pub visits: &'a [VisitRecord],
    pub selection: Option<&'a VisitId>,
    pub theme: &'a ThemeConfig,
    pub viewport: Viewport,
}

impl<'a> MapFrame<'a> {
    pub fn new(visits: &'a [VisitRecord], theme: &'a ThemeConfig, viewport: Viewport) -> Self {
        Self {
            visits,
            selection: None,
            theme,
            viewport,
        }
    }

    pub fn with_selection(mut self, selection: Option<&'a VisitId>) -> Self {
        self.selection = selection;
        self
    }
}

/// Renders visits to a [`Scene`] and resolves clicks on it.
///
/// The renderer holds no frame state: every call recomputes bounds,
/// projection and the full display list from its inputs.
pub struct ExplorationMapRenderer {
    options: RenderOptions,
    layers: Vec<Box<dyn Layer + Send + Sync>>,
    measure: Box<dyn TextMeasure + Send + Sync>,
    logger: LogManager,
    metrics: Arc<MetricsRecorder>,
}

impl ExplorationMapRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            layers: vec![
                Box::new(BackgroundLayer),
                Box::new(GridLayer),
                Box::new(GlowLayer),
                Box::new(PathLayer),
                Box::new(MarkerLayer),
                Box::new(LegendLayer),
            ],
            measure: Box::new(EstimatedTextMeasure),
            logger: LogManager::new("renderer"),
            metrics: Arc::new(MetricsRecorder::new()),
        }
    }

    pub fn with_text_measure(mut self, measure: impl TextMeasure + Send + Sync + 'static) -> Self {
        self.measure = Box::new(measure);
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn metrics(&self) -> Arc<MetricsRecorder> {
        self.metrics.clone()
    }

    pub fn render(&self, frame: &MapFrame<'_>) -> Scene {
        let mut scene = Scene::new(frame.viewport);
        let placed = Projector::new(
            frame.visits,
            frame.viewport.size(),
            &self.options.projection,
        )
        .map(|projector| {
            place_markers(
                frame.visits,
                &projector,
                frame.selection,
                &self.options,
                &self.logger,
            )
        })
        .unwrap_or_default();

        let skipped = frame.visits.len() - placed.len();
        if skipped > 0 {
            self.logger
                .warn(&format!("{skipped} visit(s) without finite coordinates skipped"));
        }

        let input = FrameInput {
            visits: frame.visits,
            placed: &placed,
            theme: frame.theme,
            options: &self.options,
            viewport: frame.viewport,
            measure: self.measure.as_ref(),
        };
        for layer in &self.layers {
            let before = scene.commands().len();
            layer.paint(&input, &mut scene);
            self.logger.record(&format!(
                "layer {} added {} commands",
                layer.name(),
                scene.commands().len() - before
            ));
        }

        self.logger.record(&format!(
            "frame {}x{} markers {} commands {}",
            frame.viewport.width,
            frame.viewport.height,
            placed.len(),
            scene.commands().len()
        ));
        self.metrics.record_frame();
        scene.set_markers(placed);
        scene
    }

    /// Visit under the pointer, if any. See [`HitTester`].
    pub fn hit_test(&self, frame: &MapFrame<'_>, pointer: &PointerEvent) -> Option<VisitId> {
        HitTester::new(&self.options).resolve(frame.visits, pointer)
    }

    /// Resolves a click and reports the resulting selection exactly once.
    ///
    /// A hit on the selected visit or a miss reports `None`.
    pub fn click<F>(&self, frame: &MapFrame<'_>, pointer: &PointerEvent, on_selection_change: F)
    where
        F: FnOnce(Option<VisitId>),
    {
        let hit = self.hit_test(frame, pointer);
        self.metrics.record_click(hit.is_some());
        let selection = next_selection(frame.selection, hit);
        self.logger.record(&format!(
            "click at ({:.1}, {:.1}) -> {}",
            pointer.position.x,
            pointer.position.y,
            selection
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "none".into())
        ));
        on_selection_change(selection);
    }
}

impl Default for ExplorationMapRenderer {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}
