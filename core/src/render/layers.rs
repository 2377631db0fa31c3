use crate::geometry::{Point, Rect};
use crate::prelude::{FrameInput, Layer, MIN_GRID_SPACING};
use crate::render::scene::{DrawCommand, Scene, Stroke, TextAlign};

/// Solid fill over the whole surface.
pub struct BackgroundLayer;

impl Layer for BackgroundLayer {
    fn name(&self) -> &'static str {
        "background"
    }

    fn paint(&self, frame: &FrameInput<'_>, scene: &mut Scene) {
        scene.push(DrawCommand::FillRect {
            rect: Rect::from_size(frame.viewport.size()),
            color: frame.theme.background,
        });
    }
}

/// Faint square grid anchored at the top-left corner.
pub struct GridLayer;

impl Layer for GridLayer {
    fn name(&self) -> &'static str {
        "grid"
    }

    fn paint(&self, frame: &FrameInput<'_>, scene: &mut Scene) {
        let spacing = frame.options.grid_spacing;
        let (width, height) = (frame.viewport.width, frame.viewport.height);
        if !(spacing >= MIN_GRID_SPACING && spacing.is_finite())
            || !(width.is_finite() && height.is_finite())
        {
            return;
        }
        let stroke = Stroke::solid(frame.theme.grid, frame.options.grid_width);

        for column in 0..line_count(width, spacing) {
            let x = column as f32 * spacing;
            scene.push(DrawCommand::Line {
                from: Point::new(x, 0.0),
                to: Point::new(x, height),
                stroke: stroke.clone(),
            });
        }
        for row in 0..line_count(height, spacing) {
            let y = row as f32 * spacing;
            scene.push(DrawCommand::Line {
                from: Point::new(0.0, y),
                to: Point::new(width, y),
                stroke: stroke.clone(),
            });
        }
    }
}

/// Upper bound on grid lines per axis.
const MAX_GRID_LINES: usize = 4096;

/// Lines at `0, spacing, 2 * spacing, ...` strictly below `extent`.
fn line_count(extent: f32, spacing: f32) -> usize {
    if !(extent > 0.0) {
        return 0;
    }
    ((extent / spacing).ceil() as usize).min(MAX_GRID_LINES)
}

/// Heat glow under every marker, painted before any marker.
pub struct GlowLayer;

impl Layer for GlowLayer {
    fn name(&self) -> &'static str {
        "glow"
    }

    fn paint(&self, frame: &FrameInput<'_>, scene: &mut Scene) {
        for marker in frame.placed {
            scene.push(DrawCommand::Glow {
                center: marker.center,
                radius: frame.options.glow_radius,
                color: marker.accent.with_alpha(frame.options.glow_alpha),
            });
        }
    }
}

/// Dashed line through the markers in input order.
pub struct PathLayer;

impl Layer for PathLayer {
    fn name(&self) -> &'static str {
        "path"
    }

    fn paint(&self, frame: &FrameInput<'_>, scene: &mut Scene) {
        if frame.placed.len() < 2 {
            return;
        }
        scene.push(DrawCommand::Polyline {
            points: frame.placed.iter().map(|marker| marker.center).collect(),
            stroke: Stroke::dashed(
                frame.theme.path,
                frame.options.path_width,
                &frame.options.path_dash,
            ),
        });
    }
}

/// Optional caption in the bottom-left corner.
pub struct LegendLayer;

impl Layer for LegendLayer {
    fn name(&self) -> &'static str {
        "legend"
    }

    fn paint(&self, frame: &FrameInput<'_>, scene: &mut Scene) {
        let Some(caption) = frame.options.legend.as_deref() else {
            return;
        };
        if caption.trim().is_empty() {
            return;
        }
        let size = 9.0;
        scene.push(DrawCommand::Text {
            content: caption.to_string(),
            position: Point::new(12.0, frame.viewport.height - 10.0),
            size,
            width: frame.measure.measure(caption, size, false),
            color: frame.theme.legend,
            bold: false,
            align: TextAlign::Left,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Viewport;
    use crate::prelude::RenderOptions;
    use crate::render::color::Rgba;
    use crate::render::scene::PlacedMarker;
    use crate::render::text::EstimatedTextMeasure;
    use crate::render::theme::ThemeConfig;

    fn marker(index: usize, x: f32, y: f32) -> PlacedMarker {
        PlacedMarker {
            id: (index as i64).into(),
            index,
            center: Point::new(x, y),
            radius: 7.0,
            accent: Rgba::palette(index),
            selected: false,
        }
    }

    fn paint(layer: &dyn Layer, placed: &[PlacedMarker], options: &RenderOptions) -> Scene {
        let theme = ThemeConfig::dark();
        let viewport = Viewport::new(90.0, 60.0);
        let frame = FrameInput {
            visits: &[],
            placed,
            theme: &theme,
            options,
            viewport,
            measure: &EstimatedTextMeasure,
        };
        let mut scene = Scene::new(viewport);
        layer.paint(&frame, &mut scene);
        scene
    }

    #[test]
    fn grid_covers_surface_at_spacing() {
        let scene = paint(&GridLayer, &[], &RenderOptions::default());
        // x = 0, 30, 60 and y = 0, 30
        assert_eq!(scene.commands().len(), 5);
    }

    #[test]
    fn grid_stays_bounded_for_degenerate_spacing_and_surface() {
        let theme = ThemeConfig::dark();
        let tiny = RenderOptions {
            grid_spacing: 1e-9,
            ..Default::default()
        };
        let defaults = RenderOptions::default();
        let cases = [
            (&tiny, Viewport::new(1.0, 1.0)),
            (&defaults, Viewport::new(f32::INFINITY, 280.0)),
            (&defaults, Viewport::new(f32::NAN, f32::NAN)),
            (&defaults, Viewport::new(3.0e7, 280.0)),
        ];
        for (options, viewport) in cases {
            let frame = FrameInput {
                visits: &[],
                placed: &[],
                theme: &theme,
                options,
                viewport,
                measure: &EstimatedTextMeasure,
            };
            let mut scene = Scene::new(viewport);
            GridLayer.paint(&frame, &mut scene);
            assert!(scene.commands().len() <= 2 * MAX_GRID_LINES);
        }
    }

    #[test]
    fn grid_includes_partial_last_cell() {
        assert_eq!(line_count(100.0, 30.0), 4);
        assert_eq!(line_count(0.0, 30.0), 0);
    }

    #[test]
    fn glow_uses_accent_with_reduced_alpha() {
        let placed = [marker(0, 10.0, 10.0)];
        let scene = paint(&GlowLayer, &placed, &RenderOptions::default());
        match &scene.commands()[0] {
            DrawCommand::Glow { color, radius, .. } => {
                assert_eq!(*color, Rgba::palette(0).with_alpha(0x30));
                assert_eq!(*radius, 40.0);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn path_needs_two_markers() {
        let options = RenderOptions::default();
        assert!(paint(&PathLayer, &[marker(0, 1.0, 1.0)], &options)
            .path()
            .is_none());
        let scene = paint(
            &PathLayer,
            &[marker(0, 1.0, 1.0), marker(1, 2.0, 2.0)],
            &options,
        );
        assert_eq!(scene.path().unwrap().len(), 2);
    }

    #[test]
    fn legend_only_when_configured() {
        assert!(paint(&LegendLayer, &[], &RenderOptions::default())
            .commands()
            .is_empty());
        let options = RenderOptions {
            legend: Some("Seoul exploration route".into()),
            ..Default::default()
        };
        let scene = paint(&LegendLayer, &[], &options);
        assert!(matches!(
            &scene.commands()[0],
            DrawCommand::Text { align: TextAlign::Left, position, .. } if position.y == 50.0
        ));
    }
}
