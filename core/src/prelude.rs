use serde::{Deserialize, Serialize};

use crate::geometry::{ProjectionOptions, Viewport};
use crate::interaction::HitPolicy;
use crate::render::label::LabelPolicy;
use crate::render::scene::{PlacedMarker, Scene};
use crate::render::text::TextMeasure;
use crate::render::theme::ThemeConfig;
use crate::visit::VisitRecord;

/// Smallest grid spacing that still renders a grid, in logical units.
pub const MIN_GRID_SPACING: f32 = 1.0;

/// Common error type for the map core.
#[derive(thiserror::Error, Debug)]
pub enum MapError {
    #[error("invalid color: {0}")]
    InvalidColor(String),
    #[error("invalid visit feed: {0}")]
    InvalidFeed(#[from] serde_json::Error),
    #[error("invalid options: {0}")]
    InvalidOptions(String),
}

pub type MapResult<T> = Result<T, MapError>;

/// Marker geometry and typography.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerStyle {
    pub radius: f32,
    pub selected_radius: f32,
    pub ring_radius: f32,
    pub ring_width: f32,
    /// Alpha applied to the accent color of the selection ring.
    pub ring_alpha: u8,
    pub outline_width: f32,
    pub index_font_size: f32,
    pub selected_index_font_size: f32,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            radius: 7.0,
            selected_radius: 10.0,
            ring_radius: 16.0,
            ring_width: 2.0,
            ring_alpha: 0x60,
            outline_width: 2.0,
            index_font_size: 7.0,
            selected_index_font_size: 9.0,
        }
    }
}

/// Floating name label shown above the selected marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelStyle {
    pub font_size: f32,
    /// Horizontal padding added to the measured text width (both sides).
    pub padding: f32,
    pub height: f32,
    pub corner_radius: f32,
    /// Distance from the marker center up to the top of the box.
    pub offset: f32,
    /// Distance from the marker center down to the top of a flipped box;
    /// clears the selection ring.
    pub flipped_offset: f32,
    pub border_width: f32,
    /// Minimum gap kept between a repositioned box and the surface edge.
    pub edge_inset: f32,
    pub policy: LabelPolicy,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            font_size: 9.0,
            padding: 16.0,
            height: 20.0,
            corner_radius: 6.0,
            offset: 32.0,
            flipped_offset: 20.0,
            border_width: 1.0,
            edge_inset: 4.0,
            policy: LabelPolicy::default(),
        }
    }
}

/// Everything about a render that is not data, selection, theme or size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub projection: ProjectionOptions,
    pub grid_spacing: f32,
    pub grid_width: f32,
    pub glow_radius: f32,
    /// Alpha applied to the accent color at the glow center.
    pub glow_alpha: u8,
    pub path_width: f32,
    pub path_dash: Vec<f32>,
    pub marker: MarkerStyle,
    pub label: LabelStyle,
    pub hit_radius: f32,
    pub hit_policy: HitPolicy,
    /// Caption drawn in the bottom-left corner.
    pub legend: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            projection: ProjectionOptions::default(),
            grid_spacing: 30.0,
            grid_width: 0.5,
            glow_radius: 40.0,
            glow_alpha: 0x30,
            path_width: 2.0,
            path_dash: vec![4.0, 6.0],
            marker: MarkerStyle::default(),
            label: LabelStyle::default(),
            hit_radius: 20.0,
            hit_policy: HitPolicy::default(),
            legend: None,
        }
    }
}

impl RenderOptions {
    pub fn validate(&self) -> MapResult<()> {
        let projection = &self.projection;
        if !(projection.lat_padding.is_finite() && projection.lat_padding >= 0.0)
            || !(projection.lon_padding.is_finite() && projection.lon_padding >= 0.0)
        {
            return Err(MapError::InvalidOptions(
                "projection padding must be a non-negative number".into(),
            ));
        }
        if !(projection.margin_x >= 0.0 && projection.margin_y >= 0.0) {
            return Err(MapError::InvalidOptions(
                "projection margins must be non-negative".into(),
            ));
        }
        if !(self.grid_spacing >= MIN_GRID_SPACING && self.grid_spacing.is_finite()) {
            return Err(MapError::InvalidOptions(format!(
                "grid spacing must be a finite value of at least {MIN_GRID_SPACING}, got {}",
                self.grid_spacing
            )));
        }
        if !(self.hit_radius > 0.0 && self.hit_radius.is_finite()) {
            return Err(MapError::InvalidOptions(format!(
                "hit radius must be positive, got {}",
                self.hit_radius
            )));
        }
        if self.path_dash.iter().any(|segment| !(*segment >= 0.0)) {
            return Err(MapError::InvalidOptions(
                "path dash segments must be non-negative".into(),
            ));
        }
        Ok(())
    }
}

/// Inputs shared by every layer of one render pass.
pub struct FrameInput<'a> {
    pub visits: &'a [VisitRecord],
    /// Markers that survived projection, in input order.
    pub placed: &'a [PlacedMarker],
    pub theme: &'a ThemeConfig,
    pub options: &'a RenderOptions,
    pub viewport: Viewport,
    pub measure: &'a dyn TextMeasure,
}

/// One back-to-front slice of the map drawing.
pub trait Layer {
    fn name(&self) -> &'static str;
    fn paint(&self, frame: &FrameInput<'_>, scene: &mut Scene);
}
