pub mod color;
pub mod invalidation;
pub mod label;
pub mod layers;
pub mod markers;
pub mod renderer;
pub mod scene;
pub mod text;
pub mod theme;

pub use color::{Rgba, FALLBACK_PALETTE};
pub use invalidation::{FrameKey, RedrawReason, RedrawTracker};
pub use label::{LabelBox, LabelPolicy};
pub use renderer::{ExplorationMapRenderer, MapFrame};
pub use scene::{DrawCommand, PlacedMarker, Scene, Stroke, TextAlign};
pub use text::{EstimatedTextMeasure, TextMeasure};
pub use theme::{ThemeConfig, ThemePreset};
