use crate::Message;
use iced::{
    font, mouse,
    widget::canvas::{self, Cache, Event, Frame, Geometry, LineDash, Path, Program},
    Color, Font, Pixels, Point, Rectangle, Renderer, Size, Theme,
};
use mapcore::geometry::{self, Rect, Viewport};
use mapcore::interaction::PointerEvent;
use mapcore::render::{DrawCommand, Rgba, Stroke, TextAlign, ThemeConfig};
use mapcore::{ExplorationMapRenderer, MapFrame, Scene, VisitId, VisitRecord};

const GLOW_STEPS: usize = 8;

const BOLD: Font = Font {
    weight: font::Weight::Bold,
    ..Font::DEFAULT
};

/// Interactive map canvas. Draws the core scene and turns left clicks into
/// selection messages.
pub struct MapCanvas<'a> {
    pub visits: &'a [VisitRecord],
    pub selection: Option<&'a VisitId>,
    pub theme: &'a ThemeConfig,
    pub viewport: Viewport,
    pub map: &'a ExplorationMapRenderer,
    pub cache: &'a Cache,
}

impl MapCanvas<'_> {
    fn frame(&self, viewport: Viewport) -> MapFrame<'_> {
        MapFrame::new(self.visits, self.theme, viewport).with_selection(self.selection)
    }

    /// Selection message for a click at a window position, resolved against
    /// the canvas bounds as laid out now rather than the last known size.
    fn click_message(&self, bounds: Rectangle, position: Point) -> Option<Message> {
        let pointer = PointerEvent::new(
            geometry::Point::new(position.x, position.y),
            Rect::new(bounds.x, bounds.y, bounds.width, bounds.height),
        );
        let viewport = Viewport::new(bounds.width, bounds.height)
            .with_pixel_ratio(self.viewport.pixel_ratio);
        let mut message = None;
        self.map.click(&self.frame(viewport), &pointer, |selection| {
            message = Some(Message::SelectionChanged(selection));
        });
        message
    }
}

impl Program<Message> for MapCanvas<'_> {
    type State = ();

    fn update(
        &self,
        _state: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        if let Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) = event {
            if cursor.is_over(bounds) {
                if let Some(position) = cursor.position() {
                    return self
                        .click_message(bounds, position)
                        .map(|message| canvas::Action::publish(message).and_capture());
                }
            }
        }

        if bounds.width != self.viewport.width || bounds.height != self.viewport.height {
            return Some(canvas::Action::publish(Message::MapResized(
                bounds.width,
                bounds.height,
            )));
        }
        None
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let viewport = Viewport::new(bounds.width, bounds.height)
            .with_pixel_ratio(self.viewport.pixel_ratio);
        let geometry = self.cache.draw(renderer, bounds.size(), |frame| {
            let scene = self.map.render(&self.frame(viewport));
            paint_scene(frame, &scene);
        });
        vec![geometry]
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if cursor.is_over(bounds) {
            mouse::Interaction::Pointer
        } else {
            mouse::Interaction::default()
        }
    }
}

/// Replays a scene onto an iced frame, back to front.
pub fn paint_scene(frame: &mut Frame, scene: &Scene) {
    for command in scene.commands() {
        match command {
            DrawCommand::FillRect { rect, color } => {
                frame.fill_rectangle(
                    point(rect.origin),
                    Size::new(rect.size.width, rect.size.height),
                    to_color(*color),
                );
            }
            DrawCommand::Line { from, to, stroke } => {
                frame.stroke(&Path::line(point(*from), point(*to)), to_stroke(stroke));
            }
            DrawCommand::Glow {
                center,
                radius,
                color,
            } => {
                // Stacked discs stand in for the radial gradient.
                let layer = to_color(*color);
                let layer = Color {
                    a: layer.a / GLOW_STEPS as f32,
                    ..layer
                };
                for step in (1..=GLOW_STEPS).rev() {
                    let step_radius = radius * step as f32 / GLOW_STEPS as f32;
                    frame.fill(&Path::circle(point(*center), step_radius), layer);
                }
            }
            DrawCommand::Polyline { points, stroke } => {
                let path = Path::new(|builder| {
                    for (index, vertex) in points.iter().enumerate() {
                        if index == 0 {
                            builder.move_to(point(*vertex));
                        } else {
                            builder.line_to(point(*vertex));
                        }
                    }
                });
                frame.stroke(&path, to_stroke(stroke));
            }
            DrawCommand::Circle {
                center,
                radius,
                fill,
                stroke,
            } => {
                let path = Path::circle(point(*center), *radius);
                if let Some(fill) = fill {
                    frame.fill(&path, to_color(*fill));
                }
                if let Some(stroke) = stroke {
                    frame.stroke(&path, to_stroke(stroke));
                }
            }
            DrawCommand::RoundedRect {
                rect,
                radius,
                fill,
                stroke,
            } => {
                let path = Path::rounded_rectangle(
                    point(rect.origin),
                    Size::new(rect.size.width, rect.size.height),
                    (*radius).into(),
                );
                if let Some(fill) = fill {
                    frame.fill(&path, to_color(*fill));
                }
                if let Some(stroke) = stroke {
                    frame.stroke(&path, to_stroke(stroke));
                }
            }
            DrawCommand::Text {
                content,
                position,
                size,
                width,
                color,
                bold,
                align,
            } => {
                frame.fill_text(canvas::Text {
                    content: content.clone(),
                    position: text_origin(*position, *size, *width, *align),
                    color: to_color(*color),
                    size: Pixels(*size),
                    font: if *bold { BOLD } else { Font::DEFAULT },
                    ..canvas::Text::default()
                });
            }
        }
    }
}

fn point(value: geometry::Point) -> Point {
    Point::new(value.x, value.y)
}

fn to_color(color: Rgba) -> Color {
    Color::from_rgba8(color.r, color.g, color.b, color.alpha_f32())
}

fn to_stroke(stroke: &Stroke) -> canvas::Stroke<'_> {
    let mut converted = canvas::Stroke::default()
        .with_color(to_color(stroke.color))
        .with_width(stroke.width);
    if let Some(dash) = &stroke.dash {
        converted.line_dash = LineDash {
            segments: dash,
            offset: 0,
        };
    }
    converted
}

/// Scene text is anchored on its vertical middle; iced places text by its
/// top-left corner.
fn text_origin(position: geometry::Point, size: f32, width: f32, align: TextAlign) -> Point {
    let left = match align {
        TextAlign::Left => position.x,
        TextAlign::Center => position.x - width / 2.0,
    };
    Point::new(left, position.y - size * 0.6)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_text_is_shifted_by_half_its_width() {
        let origin = text_origin(geometry::Point::new(100.0, 50.0), 10.0, 40.0, TextAlign::Center);
        assert_eq!(origin, Point::new(80.0, 44.0));
        let origin = text_origin(geometry::Point::new(100.0, 50.0), 10.0, 40.0, TextAlign::Left);
        assert_eq!(origin.x, 100.0);
    }

    #[test]
    fn click_resolves_before_the_resize_is_known() {
        let visits = vec![
            VisitRecord::new(1, "Book Cafe", 37.55, 126.92),
            VisitRecord::new(2, "Hidden Garden", 37.57, 126.98),
        ];
        let theme = ThemeConfig::dark();
        let map = ExplorationMapRenderer::default();
        let cache = Cache::new();
        let canvas = MapCanvas {
            visits: &visits,
            selection: None,
            theme: &theme,
            viewport: Viewport::new(0.0, 280.0),
            map: &map,
            cache: &cache,
        };
        let scene = map.render(&MapFrame::new(&visits, &theme, Viewport::new(360.0, 280.0)));
        let target = scene.markers()[1].center;
        let bounds = Rectangle::new(Point::new(20.0, 40.0), Size::new(360.0, 280.0));

        let message = canvas.click_message(bounds, Point::new(target.x + 20.0, target.y + 40.0));
        assert!(matches!(
            message,
            Some(Message::SelectionChanged(Some(VisitId::Number(2))))
        ));
        let missed = canvas.click_message(bounds, Point::new(21.0, 41.0));
        assert!(matches!(missed, Some(Message::SelectionChanged(None))));
    }

    #[test]
    fn colors_keep_alpha() {
        let color = to_color(Rgba::rgba(0xE8, 0x74, 0x0C, 0x30));
        assert!((color.a - 0x30 as f32 / 255.0).abs() < 1e-6);
        assert!((color.r - 0xE8 as f32 / 255.0).abs() < 1e-6);
    }
}
