use crate::geometry::{Point, Rect, Viewport};
use crate::render::color::Rgba;
use crate::visit::VisitId;

#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f32,
    /// Alternating dash and gap lengths; `None` is a solid line.
    pub dash: Option<Vec<f32>>,
}

impl Stroke {
    pub fn solid(color: Rgba, width: f32) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub fn dashed(color: Rgba, width: f32, dash: &[f32]) -> Self {
        Self {
            color,
            width,
            dash: if dash.is_empty() {
                None
            } else {
                Some(dash.to_vec())
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// A single drawing operation in logical units.
///
/// Text is anchored on its vertical middle; `position.x` is the left edge or
/// the center depending on `align`, and `width` is the measured advance.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        color: Rgba,
    },
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
    },
    /// Radial gradient from `color` at the center to transparent at `radius`.
    Glow {
        center: Point,
        radius: f32,
        color: Rgba,
    },
    Polyline {
        points: Vec<Point>,
        stroke: Stroke,
    },
    Circle {
        center: Point,
        radius: f32,
        fill: Option<Rgba>,
        stroke: Option<Stroke>,
    },
    RoundedRect {
        rect: Rect,
        radius: f32,
        fill: Option<Rgba>,
        stroke: Option<Stroke>,
    },
    Text {
        content: String,
        position: Point,
        size: f32,
        width: f32,
        color: Rgba,
        bold: bool,
        align: TextAlign,
    },
}

/// Where a visit's marker ended up in a rendered scene.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedMarker {
    pub id: VisitId,
    /// Position of the visit in the input sequence.
    pub index: usize,
    pub center: Point,
    pub radius: f32,
    pub accent: Rgba,
    pub selected: bool,
}

impl PlacedMarker {
    /// 1-based number drawn inside the marker.
    pub fn ordinal(&self) -> usize {
        self.index + 1
    }
}

/// Ordered display list for one frame, back to front.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    viewport: Viewport,
    commands: Vec<DrawCommand>,
    markers: Vec<PlacedMarker>,
}

impl Scene {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            commands: Vec::new(),
            markers: Vec::new(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub(crate) fn set_markers(&mut self, markers: Vec<PlacedMarker>) {
        self.markers = markers;
    }

    pub fn markers(&self) -> &[PlacedMarker] {
        &self.markers
    }

    pub fn selected_marker(&self) -> Option<&PlacedMarker> {
        self.markers.iter().find(|marker| marker.selected)
    }

    /// Vertices of the connective path, in drawing order.
    pub fn path(&self) -> Option<&[Point]> {
        self.commands.iter().find_map(|command| match command {
            DrawCommand::Polyline { points, .. } => Some(points.as_slice()),
            _ => None,
        })
    }
}
