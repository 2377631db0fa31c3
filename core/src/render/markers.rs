use crate::geometry::Projector;
use crate::prelude::{FrameInput, Layer, RenderOptions};
use crate::render::color::Rgba;
use crate::render::label::place_label;
use crate::render::scene::{DrawCommand, PlacedMarker, Scene, Stroke, TextAlign};
use crate::telemetry::log::LogManager;
use crate::visit::{VisitId, VisitRecord};

/// Accent color of the visit at `index`, falling back to the palette when the
/// record has none or it does not parse.
pub fn resolve_accent(visit: &VisitRecord, index: usize, logger: &LogManager) -> Rgba {
    match visit.accent_color.as_deref().map(Rgba::parse) {
        Some(Ok(color)) => color,
        Some(Err(err)) => {
            logger.warn(&format!("visit {}: {err}, using palette color", visit.id));
            Rgba::palette(index)
        }
        None => Rgba::palette(index),
    }
}

/// Projects every drawable visit and records how its marker will look.
pub fn place_markers(
    visits: &[VisitRecord],
    projector: &Projector,
    selection: Option<&VisitId>,
    options: &RenderOptions,
    logger: &LogManager,
) -> Vec<PlacedMarker> {
    projector
        .project_visits(visits)
        .into_iter()
        .map(|(index, center)| {
            let visit = &visits[index];
            let selected = selection == Some(&visit.id);
            PlacedMarker {
                id: visit.id.clone(),
                index,
                center,
                radius: if selected {
                    options.marker.selected_radius
                } else {
                    options.marker.radius
                },
                accent: resolve_accent(visit, index, logger),
                selected,
            }
        })
        .collect()
}

/// Numbered markers, the selection ring and the selected name label.
pub struct MarkerLayer;

impl MarkerLayer {
    fn paint_label(&self, frame: &FrameInput<'_>, marker: &PlacedMarker, scene: &mut Scene) {
        let Some(visit) = frame.visits.get(marker.index) else {
            return;
        };
        let style = &frame.options.label;
        let text_width = frame
            .measure
            .measure(&visit.place_name, style.font_size, true);
        let label = place_label(marker.center, text_width, &frame.viewport, style);

        scene.push(DrawCommand::RoundedRect {
            rect: label.rect,
            radius: style.corner_radius,
            fill: Some(frame.theme.label_background),
            stroke: Some(Stroke::solid(frame.theme.label_border, style.border_width)),
        });
        scene.push(DrawCommand::Text {
            content: visit.place_name.clone(),
            position: label.text_center,
            size: style.font_size,
            width: text_width,
            color: frame.theme.label_text,
            bold: true,
            align: TextAlign::Center,
        });
    }
}

impl Layer for MarkerLayer {
    fn name(&self) -> &'static str {
        "markers"
    }

    fn paint(&self, frame: &FrameInput<'_>, scene: &mut Scene) {
        let style = &frame.options.marker;
        for marker in frame.placed {
            if marker.selected {
                scene.push(DrawCommand::Circle {
                    center: marker.center,
                    radius: style.ring_radius,
                    fill: None,
                    stroke: Some(Stroke::solid(
                        marker.accent.with_alpha(style.ring_alpha),
                        style.ring_width,
                    )),
                });
            }

            scene.push(DrawCommand::Circle {
                center: marker.center,
                radius: marker.radius,
                fill: Some(marker.accent),
                stroke: Some(Stroke::solid(
                    frame.theme.marker_outline,
                    style.outline_width,
                )),
            });

            let ordinal = marker.ordinal().to_string();
            let size = if marker.selected {
                style.selected_index_font_size
            } else {
                style.index_font_size
            };
            scene.push(DrawCommand::Text {
                width: frame.measure.measure(&ordinal, size, true),
                content: ordinal,
                position: marker.center,
                size,
                color: frame.theme.marker_text,
                bold: true,
                align: TextAlign::Center,
            });

            if marker.selected {
                self.paint_label(frame, marker, scene);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{ProjectionOptions, Size};

    #[test]
    fn accent_falls_back_to_palette_by_index() {
        let logger = LogManager::new("test");
        let plain = VisitRecord::new(1, "a", 37.5, 127.0);
        let broken = VisitRecord::new(2, "b", 37.5, 127.0).with_accent("not-a-color");
        let tinted = VisitRecord::new(3, "c", 37.5, 127.0).with_accent("#2D9F5D");
        assert_eq!(resolve_accent(&plain, 4, &logger), Rgba::palette(4));
        assert_eq!(resolve_accent(&broken, 1, &logger), Rgba::palette(1));
        assert_eq!(
            resolve_accent(&tinted, 0, &logger),
            Rgba::rgb(0x2D, 0x9F, 0x5D)
        );
    }

    #[test]
    fn selected_marker_is_enlarged_and_keeps_input_index() {
        let visits = vec![
            VisitRecord::new(1, "a", f64::NAN, 127.0),
            VisitRecord::new(2, "b", 37.55, 127.0),
            VisitRecord::new(3, "c", 37.56, 126.92),
        ];
        let options = RenderOptions::default();
        let projector =
            Projector::new(&visits, Size::new(360.0, 280.0), &ProjectionOptions::default())
                .unwrap();
        let selected = VisitId::Number(3);
        let placed = place_markers(
            &visits,
            &projector,
            Some(&selected),
            &options,
            &LogManager::new("test"),
        );
        assert_eq!(placed.len(), 2);
        assert_eq!(placed[0].ordinal(), 2);
        assert!(!placed[0].selected);
        assert_eq!(placed[0].radius, 7.0);
        assert!(placed[1].selected);
        assert_eq!(placed[1].radius, 10.0);
    }
}
