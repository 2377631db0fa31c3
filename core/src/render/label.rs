use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect, Viewport};
use crate::prelude::LabelStyle;

/// What to do when the selected marker's label would leave the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelPolicy {
    /// Slide the box back inside horizontally and flip it below the marker
    /// when it would cross the top edge.
    #[default]
    Reposition,
    /// Keep the box centered above the marker even if it overflows.
    Overflow,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelBox {
    pub rect: Rect,
    pub text_center: Point,
}

pub fn place_label(center: Point, text_width: f32, viewport: &Viewport, style: &LabelStyle) -> LabelBox {
    let width = text_width + style.padding;
    let mut rect = Rect::new(
        center.x - width / 2.0,
        center.y - style.offset,
        width,
        style.height,
    );

    if style.policy == LabelPolicy::Reposition {
        let inset = style.edge_inset;
        let max_x = (viewport.width - width - inset).max(inset);
        rect.origin.x = rect.origin.x.clamp(inset, max_x);
        if rect.origin.y < inset {
            rect.origin.y = center.y + style.flipped_offset;
        }
    }

    LabelBox {
        text_center: Point::new(
            rect.origin.x + width / 2.0,
            rect.origin.y + style.height / 2.0,
        ),
        rect,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(360.0, 280.0)
    }

    #[test]
    fn centered_above_marker_when_room_allows() {
        let label = place_label(Point::new(180.0, 140.0), 40.0, &viewport(), &LabelStyle::default());
        assert_eq!(label.rect, Rect::new(152.0, 108.0, 56.0, 20.0));
        assert_eq!(label.text_center, Point::new(180.0, 118.0));
    }

    #[test]
    fn reposition_keeps_box_inside_right_edge() {
        let label = place_label(Point::new(350.0, 140.0), 80.0, &viewport(), &LabelStyle::default());
        assert!(label.rect.right() <= 360.0 - 4.0 + f32::EPSILON);
        assert!(label.rect.origin.x >= 4.0);
    }

    #[test]
    fn reposition_flips_below_near_top_edge() {
        let style = LabelStyle::default();
        let center = Point::new(180.0, 20.0);
        let label = place_label(center, 40.0, &viewport(), &style);
        assert_eq!(label.rect.origin.y, 40.0);
        let ring_radius = crate::prelude::MarkerStyle::default().ring_radius;
        assert!(label.rect.origin.y > center.y + ring_radius);
    }

    #[test]
    fn overflow_policy_keeps_source_placement() {
        let style = LabelStyle {
            policy: LabelPolicy::Overflow,
            ..Default::default()
        };
        let label = place_label(Point::new(5.0, 10.0), 40.0, &viewport(), &style);
        assert_eq!(label.rect.origin, Point::new(-23.0, -22.0));
    }

    #[test]
    fn label_wider_than_surface_pins_to_left_inset() {
        let label = place_label(Point::new(50.0, 140.0), 500.0, &viewport(), &LabelStyle::default());
        assert_eq!(label.rect.origin.x, 4.0);
    }
}
